use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use beetmover_manifest::{ExpectedFileSet, MappingManifest, UpstreamTask, load_upstream_tasks, resolve};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::{Config, LogFormat};
use crate::pipeline::Pipeline;
use crate::sink::TracingSink;

#[derive(Clone, Debug, Parser)]
#[command(name = "beetmover", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// TOML settings file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "exp", name = "expected", about = "Print the files every archive must hold")]
    Expected(ExpectedArg),
    #[command(alias = "x", name = "extract", about = "Check and extract archives, print the files to publish")]
    Extract(ExtractArg),
}

#[derive(Clone, Debug, Args)]
pub struct Inputs {
    /// Mapping manifest (JSON).
    #[arg(long)]
    pub manifest: PathBuf,
    /// Upstream task descriptors (JSON array).
    #[arg(long)]
    pub tasks: PathBuf,
    #[arg(long)]
    pub locale: Option<String>,
    #[arg(long)]
    pub archive_name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ExpectedArg {
    #[command(flatten)]
    pub inputs: Inputs,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArg {
    #[command(flatten)]
    pub inputs: Inputs,
    /// Base directory for relative artifact paths.
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,
    #[arg(long)]
    pub max_size_mb: Option<u64>,
    #[arg(long)]
    pub max_compression_ratio: Option<f64>,
}

impl App {
    /// Settings from `--config` (or defaults) with command-line flags applied on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };

        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        let inputs = match &self.cmd {
            Commands::Expected(arg) => &arg.inputs,
            Commands::Extract(arg) => {
                if let Some(dir) = &arg.artifacts_dir {
                    config.artifacts_dir = Some(dir.clone());
                }
                if let Some(max_size_mb) = arg.max_size_mb {
                    config.zip_max_file_size_in_mb = max_size_mb;
                }
                if let Some(ratio) = arg.max_compression_ratio {
                    config.max_compression_ratio = ratio;
                }
                &arg.inputs
            }
        };
        if let Some(locale) = &inputs.locale {
            config.reference_locale = locale.clone();
        }
        if let Some(name) = &inputs.archive_name {
            config.archive_name = name.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run `cmd` and return what it prints on stdout.
pub fn execute(cmd: &Commands, config: &Config) -> Result<String> {
    match cmd {
        Commands::Expected(arg) => {
            let (tasks, manifest) = load_inputs(&arg.inputs)?;
            let expected = resolve_expected(&tasks, &manifest, config)?;
            Ok(serde_json::to_string_pretty(&expected)?)
        }
        Commands::Extract(arg) => {
            let (tasks, manifest) = load_inputs(&arg.inputs)?;
            let tasks = resolve_artifact_paths(tasks, config.artifacts_dir.as_deref())?;
            let expected = resolve_expected(&tasks, &manifest, config)?;

            let pipeline = Pipeline::new(config.limits(), TracingSink);
            let deliverables = pipeline.run(&tasks, &expected)?;
            info!(files = deliverables.len(), "all archives extracted");
            Ok(serde_json::to_string_pretty(&deliverables.into_files())?)
        }
    }
}

fn load_inputs(inputs: &Inputs) -> Result<(Vec<UpstreamTask>, MappingManifest)> {
    let file = File::open(&inputs.tasks)
        .with_context(|| format!("failed to open task descriptors '{}'", inputs.tasks.display()))?;
    let tasks = load_upstream_tasks(BufReader::new(file))
        .with_context(|| format!("invalid task descriptors in '{}'", inputs.tasks.display()))?;
    let manifest = MappingManifest::from_path(&inputs.manifest).map_err(crate::Error::from)?;
    Ok((tasks, manifest))
}

fn resolve_expected(
    tasks: &[UpstreamTask],
    manifest: &MappingManifest,
    config: &Config,
) -> Result<ExpectedFileSet> {
    resolve(tasks, manifest, &config.archive_name, &config.reference_locale)
        .map_err(crate::Error::from)
        .context("failed to resolve the files expected in archives")
}

/// Anchor relative artifact paths at `<artifacts_dir>/<task_id>/`.
///
/// Without a base directory, paths are left alone.
pub fn resolve_artifact_paths(
    tasks: Vec<UpstreamTask>,
    artifacts_dir: Option<&Path>,
) -> Result<Vec<UpstreamTask>> {
    let Some(base) = artifacts_dir else {
        return Ok(tasks);
    };
    let base = std::path::absolute(base)
        .with_context(|| format!("failed to resolve artifacts dir '{}'", base.display()))?;

    Ok(tasks
        .into_iter()
        .map(|mut task| {
            let task_dir = base.join(&task.task_id);
            for path in &mut task.paths {
                if Path::new(path.as_str()).is_relative() {
                    *path = task_dir.join(path.as_str()).display().to_string();
                }
            }
            task
        })
        .collect())
}

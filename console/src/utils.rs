use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(short, long, global = true, help = "Print debug messages")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Display progress bar")]
    pub progress: bool,

    #[arg(
        short = 'T',
        long,
        global = true,
        help = "Number of worker threads (all cores by default)"
    )]
    pub threads: Option<usize>,
}

impl UtilsArgs {
    /// Initializes logging and the worker pool size. `RUST_LOG` takes
    /// precedence over `--verbose`.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = if self.verbose {
            LevelFilter::Debug
        }
        else {
            LevelFilter::Info
        };
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

        if let Some(threads) = self.threads {
            if threads == 0 {
                bail!("Number of threads must be positive");
            }
            // read once, when the pool is first used
            std::env::set_var("SVLOCUS_NUM_THREADS", threads.to_string());
        }
        Ok(())
    }
}

pub(crate) fn init_progress(
    total: Option<usize>,
    enabled: bool,
) -> anyhow::Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }
    let progress_bar = match total {
        Some(total) => {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}, ETA: {eta}] [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}")?
                    .progress_chars("#>-"),
            );
            bar
        },
        None => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")?,
            );
            spinner
        },
    };
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        bail!("Input path {} does not exist", path.display());
    }
    if !path.is_file() {
        bail!("Input path {} is not a file", path.display());
    }
    Ok(path.to_path_buf())
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_dir() {
        bail!("Output path {} is a directory", path.display());
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            bail!("Output directory {} does not exist", parent.display())
        },
        _ => Ok(path.to_path_buf()),
    }
}

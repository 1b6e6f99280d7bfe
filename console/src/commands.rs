use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use console::style;
use itertools::Itertools;
use log::{info, warn};
use svlocus::prelude::*;

use crate::utils::{init_progress, validate_input, validate_output, UtilsArgs};
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct MergeArgs {
    #[arg(value_parser, num_args = 1.., required = true, help = "Paths to snapshots")]
    inputs: Vec<PathBuf>,

    #[arg(short, long, required = true, help = "Path to merged snapshot")]
    output: PathBuf,

    #[arg(
        long,
        default_value_t = false,
        help = "Skip the consistency check of the merged set"
    )]
    no_verify: bool,
}

impl PipelineCommand for MergeArgs {
    fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let inputs = self
            .inputs
            .iter()
            .map(|path| validate_input(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let output = validate_output(&self.output)?;

        let progress_bar = init_progress(Some(inputs.len()), utils.progress)?;
        let mut merged = LocusSet::new();
        for path in inputs.iter() {
            progress_bar.set_message(path.display().to_string());
            let set = LocusSet::from_file(path, LocusSetConfig::default())?;
            info!(
                "Merging {} loci from {}",
                set.len(),
                path.display()
            );
            merged.merge_set(set);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        if !self.no_verify {
            merged.verify()?;
        }
        merged.save(&output)?;
        println!(
            "{} {} loci ({} nodes) written to {}",
            style("Merged").green(),
            merged.len(),
            merged.node_count(),
            style(output.display()).bold()
        );
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct CheckArgs {
    #[arg(value_parser, num_args = 1.., required = true, help = "Paths to snapshots")]
    inputs: Vec<PathBuf>,
}

impl PipelineCommand for CheckArgs {
    fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = LocusSetConfig::default().with_verify_on_load(false);
        let progress_bar = init_progress(Some(self.inputs.len()), utils.progress)?;

        let mut failed = Vec::new();
        for path in self.inputs.iter() {
            let result = validate_input(path)
                .and_then(|path| LocusSet::from_file(path, config.clone()))
                .and_then(|set| set.verify().map(|_| set).map_err(Into::into));
            progress_bar.inc(1);
            match result {
                Ok(set) => {
                    progress_bar.println(format!(
                        "{} {} ({} loci, {} nodes)",
                        style("OK").green(),
                        path.display(),
                        set.len(),
                        set.node_count()
                    ));
                },
                Err(e) => {
                    warn!("Check of {} failed: {:#}", path.display(), e);
                    progress_bar.println(format!(
                        "{} {}: {:#}",
                        style("FAILED").red(),
                        path.display(),
                        e
                    ));
                    failed.push(path.display().to_string());
                },
            }
        }
        progress_bar.finish_and_clear();

        if !failed.is_empty() {
            bail!("{} snapshot(s) failed the check: {}", failed.len(), failed.iter().join(", "));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct DumpArgs {
    #[arg(required = true, help = "Path to snapshot")]
    input: PathBuf,

    #[arg(long, default_value_t = false, help = "Print the interval index instead of the loci")]
    index: bool,
}

impl PipelineCommand for DumpArgs {
    fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let input = validate_input(&self.input)?;
        let set = LocusSet::from_file(input, LocusSetConfig::default())?;

        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        if self.index {
            set.dump_index(&mut writer)?;
        }
        else {
            set.dump(&mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct StatsArgs {
    #[arg(required = true, help = "Path to snapshot")]
    input: PathBuf,
}

impl PipelineCommand for StatsArgs {
    fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let input = validate_input(&self.input)?;
        let set = LocusSet::from_file(&input, LocusSetConfig::default())?;
        println!("{}", style(input.display()).bold());
        print!("{}", set.stats());
        Ok(())
    }
}

mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use commands::{CheckArgs, DumpArgs, MergeArgs, StatsArgs};
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Merge several snapshots into one
    Merge {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  MergeArgs,
    },

    /// Verify the consistency of snapshots
    Check {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CheckArgs,
    },

    /// Print every locus of a snapshot
    Dump {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  DumpArgs,
    },

    /// Print summary statistics of a snapshot
    Stats {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  StatsArgs,
    },
}

pub(crate) trait PipelineCommand {
    fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()>;
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Merge { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Check { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Dump { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Stats { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}

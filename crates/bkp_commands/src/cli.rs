use crate::cancel::CancelCommand;
use crate::command::BkpCommand;
use crate::open::OpenCommand;
use crate::overview::OverviewCommand;
use crate::remove::RemoveCommand;
use crate::run::RunCommand;
use crate::schedule::ScheduleCommand;
use anyhow::Result;
use bkp_config::definitions::VERSION;
use clap::{Parser, Subcommand};

#[derive(Subcommand)]
enum Commands {
    Overview(OverviewCommand),
    Run(RunCommand),
    Cancel(CancelCommand),
    Rm(RemoveCommand),
    Schedule(ScheduleCommand),
    Open(OpenCommand),
}

#[derive(Parser)]
#[command(name = "Bkp", version = VERSION, about = "Overview and control of backup jobs")]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short = 'v', long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl BkpCommand for Cli {
    fn verbose(&self) -> bool {
        self.verbose
            || match &self.command {
                Commands::Overview(overview) => overview.verbose(),
                Commands::Run(run) => run.verbose(),
                Commands::Cancel(cancel) => cancel.verbose(),
                Commands::Rm(remove) => remove.verbose(),
                Commands::Schedule(schedule) => schedule.verbose(),
                Commands::Open(open) => open.verbose(),
            }
    }

    fn exec(self) -> Result<()> {
        match self.command {
            Commands::Overview(overview) => overview.exec(),
            Commands::Run(run) => run.exec(),
            Commands::Cancel(cancel) => cancel.exec(),
            Commands::Rm(remove) => remove.exec(),
            Commands::Schedule(schedule) => schedule.exec(),
            Commands::Open(open) => open.exec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_verbose_flag_is_accepted_before_and_after_the_subcommand() {
        assert!(Cli::parse_from(["bkp", "-v", "overview"]).verbose());
        assert!(Cli::parse_from(["bkp", "overview", "--verbose"]).verbose());
        assert!(!Cli::parse_from(["bkp", "overview"]).verbose());
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["bkp"]).is_err());
    }

    #[test]
    fn cli_rm_subcommand_is_recognized() {
        let cli = Cli::parse_from(["bkp", "rm", "-i", "job-1"]);
        assert!(matches!(cli.command, Commands::Rm(_)));
    }
}

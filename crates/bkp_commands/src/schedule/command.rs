use crate::command::BkpCommand;
use crate::remote::Remote;
use anyhow::Result;
use bkp_core::rows::ScheduleToggle;
use bkp_utils::term::print_info;
use clap::{Args, Subcommand};
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Args)]
pub struct ScheduleStateCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server")]
    server: Option<String>,

    #[arg(short = 'i', long = "id", help = "The id of the schedule")]
    id: String,
}

impl ScheduleStateCommand {
    fn toggle(self, toggle: ScheduleToggle) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        debug!("running schedule subcommand with --id: {} ({toggle:?})", self.id);

        Runtime::new()?.block_on(async move {
            remote
                .coordinator(false)
                .toggle_schedule(&self.id, toggle)
                .await?;
            let state = match toggle {
                ScheduleToggle::Enable => "enabled",
                ScheduleToggle::Disable => "disabled",
            };
            print_info(&format!("schedule {} {state}", self.id))
        })
    }
}

#[derive(Subcommand)]
pub enum ScheduleCommands {
    #[command(about = "Enables a schedule")]
    Enable(ScheduleStateCommand),
    #[command(about = "Disables a schedule")]
    Disable(ScheduleStateCommand),
}

#[derive(Args)]
#[command(about = "Enables or disables the schedule of a job")]
pub struct ScheduleCommand {
    #[command(subcommand)]
    command: ScheduleCommands,
}

impl BkpCommand for ScheduleCommand {
    fn verbose(&self) -> bool {
        match &self.command {
            ScheduleCommands::Enable(cmd) | ScheduleCommands::Disable(cmd) => cmd.verbose,
        }
    }

    fn exec(self) -> Result<()> {
        match self.command {
            ScheduleCommands::Enable(cmd) => cmd.toggle(ScheduleToggle::Enable),
            ScheduleCommands::Disable(cmd) => cmd.toggle(ScheduleToggle::Disable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        schedule: ScheduleCommand,
    }

    #[test]
    fn cli_schedule_enable_accepts_id() {
        let cli = Wrapper::parse_from(["schedule", "enable", "-i", "s1"]);
        match cli.schedule.command {
            ScheduleCommands::Enable(cmd) => assert_eq!(cmd.id, "s1"),
            ScheduleCommands::Disable(_) => panic!("expected enable"),
        }
    }

    #[test]
    fn cli_schedule_disable_accepts_server_and_verbose() {
        let cli = Wrapper::parse_from(["schedule", "disable", "-i", "s1", "-s", "lab", "--verbose"]);
        assert!(cli.schedule.verbose());
        match cli.schedule.command {
            ScheduleCommands::Disable(cmd) => assert_eq!(cmd.server.as_deref(), Some("lab")),
            ScheduleCommands::Enable(_) => panic!("expected disable"),
        }
    }
}

use crate::command::BkpCommand;
use crate::remote::Remote;
use anyhow::Result;
use bkp_core::actions::ActionOutcome;
use bkp_utils::term::print_info;
use clap::Args;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Args)]
#[command(about = "Runs a backup or metadata backup job")]
pub struct RunCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server")]
    server: Option<String>,

    #[arg(short = 'i', long = "id", help = "The id, or a unique prefix of it, of the job")]
    id: String,

    #[arg(long = "schedule", help = "The id of the schedule to run the job with")]
    schedule: Option<String>,

    #[arg(short = 'y', long = "yes", help = "Runs the job without asking for confirmation")]
    yes: bool,
}

impl BkpCommand for RunCommand {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn exec(self) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        debug!(
            "running run subcommand with --id: {} --schedule: {:?}",
            self.id, self.schedule
        );

        Runtime::new()?.block_on(async move {
            let job = remote.find_job(&self.id).await?;
            let outcome = remote
                .coordinator(self.yes)
                .run_job(&job, self.schedule.as_deref())
                .await?;
            match outcome {
                ActionOutcome::Dispatched => print_info(&format!("job {} started", job.name)),
                _ => print_info("run aborted"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        run: RunCommand,
    }

    #[test]
    fn cli_run_id_arg_accepts_value() {
        let cli = Wrapper::parse_from(["run", "-i", "2a1c6e3f"]);
        assert_eq!(cli.run.id, "2a1c6e3f");
        assert!(!cli.run.yes);
        assert!(cli.run.schedule.is_none());
    }

    #[test]
    fn cli_run_schedule_and_yes_args() {
        let cli = Wrapper::parse_from(["run", "-i", "2a1c", "--schedule", "s1", "-y", "-s", "lab"]);
        assert_eq!(cli.run.schedule.as_deref(), Some("s1"));
        assert_eq!(cli.run.server.as_deref(), Some("lab"));
        assert!(cli.run.yes);
    }

    #[test]
    fn cli_run_requires_an_id() {
        assert!(Wrapper::try_parse_from(["run"]).is_err());
    }
}

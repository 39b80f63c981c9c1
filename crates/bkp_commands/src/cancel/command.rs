use crate::command::BkpCommand;
use crate::remote::Remote;
use anyhow::Result;
use bkp_core::actions::ActionOutcome;
use bkp_utils::term::print_info;
use clap::Args;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Args)]
#[command(about = "Cancels the current run of a job")]
pub struct CancelCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server")]
    server: Option<String>,

    #[arg(short = 'i', long = "id", help = "The id, or a unique prefix of it, of the job")]
    id: String,
}

impl BkpCommand for CancelCommand {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn exec(self) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        debug!("running cancel subcommand with --id: {}", self.id);

        Runtime::new()?.block_on(async move {
            let job = remote.find_job(&self.id).await?;
            match remote.coordinator(false).cancel_job(&job).await? {
                ActionOutcome::Skipped => print_info(&format!("job {} is not running", job.name)),
                _ => print_info(&format!("cancel of job {} requested", job.name)),
            }
        })
    }
}

use crate::command::BkpCommand;
use crate::remote::{Remote, select_jobs};
use anyhow::Result;
use bkp_core::actions::ActionOutcome;
use bkp_utils::term::print_info;
use clap::Args;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Args)]
#[command(about = "Deletes backup and metadata backup jobs")]
pub struct RemoveCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server")]
    server: Option<String>,

    #[arg(
        short = 'i',
        long = "id",
        required = true,
        help = "The id, or a unique prefix of it, of a job to delete. Can be used multiple times"
    )]
    ids: Vec<String>,
}

impl BkpCommand for RemoveCommand {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn exec(self) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        debug!("running rm subcommand with --id: {:?}", self.ids);

        Runtime::new()?.block_on(async move {
            let selection = select_jobs(remote.jobs().await?, &self.ids)?;

            match remote.coordinator(false).delete_jobs(&selection).await? {
                ActionOutcome::Dispatched => {
                    print_info(&format!("{} jobs deleted", selection.len()))
                }
                _ => print_info("nothing to delete"),
            }
        })
    }
}

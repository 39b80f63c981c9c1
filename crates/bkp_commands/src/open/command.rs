use crate::command::BkpCommand;
use crate::remote::Remote;
use anyhow::Result;
use bkp_core::actions::NavigationRequest;
use clap::{ArgGroup, Args};
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Args)]
#[command(about = "Prints the console url of the VMs matched by a job or of its edit page")]
#[command(group(ArgGroup::new("target").required(true).args(["vms", "edit"])))]
pub struct OpenCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server")]
    server: Option<String>,

    #[arg(short = 'i', long = "id", help = "The id, or a unique prefix of it, of the job")]
    id: String,

    #[arg(long = "vms", help = "Open the VMs matched by the job")]
    vms: bool,

    #[arg(long = "edit", help = "Open the edit page of the job")]
    edit: bool,
}

impl OpenCommand {
    fn request(&self) -> NavigationRequest {
        if self.vms {
            NavigationRequest::MatchingVms
        } else {
            NavigationRequest::Edit
        }
    }
}

impl BkpCommand for OpenCommand {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn exec(self) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        let request = self.request();
        debug!("running open subcommand with --id: {} ({request:?})", self.id);

        Runtime::new()?.block_on(async move {
            let job = remote.find_job(&self.id).await?;
            remote.coordinator(false).navigate(&job, request)?;
            Ok(())
        })
    }
}

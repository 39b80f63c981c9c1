use crate::command::BkpCommand;
use crate::remote::Remote;
use anyhow::{Result, anyhow};
use bkp_config::BkpConfig;
use bkp_core::overview::{Overview, OverviewFeeds};
use bkp_core::poller::Poller;
use bkp_core::render::{HEADERS, SortKey, describe, sort_rows};
use bkp_core::rows::Row;
use bkp_core::settings::SettingsResolver;
use bkp_models::dtos::OverviewSnapshot;
use bkp_utils::sync::IntoArc;
use clap::{Args, ValueEnum};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    #[default]
    Name,
    Mode,
}

impl From<SortBy> for SortKey {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Name => SortKey::Name,
            SortBy::Mode => SortKey::Mode,
        }
    }
}

#[derive(Args)]
#[command(about = "Prints the overview of the backup jobs of a server")]
pub struct OverviewCommand {
    #[arg(long = "verbose", help = "Sets the level of verbosity")]
    verbose: bool,

    #[arg(short = 's', long = "server", help = "The name of the server to fetch the jobs from")]
    server: Option<String>,

    #[arg(
        short = 'f',
        long = "file",
        conflicts_with_all = ["server", "watch"],
        help = "Reads the jobs, schedules and logs from a yaml or json snapshot instead of a server"
    )]
    file: Option<PathBuf>,

    #[arg(long = "sort", value_enum, default_value_t = SortBy::Name, help = "The column to sort the rows by")]
    sort: SortBy,

    #[arg(short = 'w', long = "watch", help = "Keeps polling the server and prints the table on every change")]
    watch: bool,
}

pub fn load_snapshot(path: &Path) -> Result<OverviewSnapshot> {
    debug!("loading snapshot from: {}", path.display());
    let content = read_to_string(path)?;
    serde_yaml_ng::from_str(&content).map_err(|e| anyhow!(e))
}

pub fn render_table(rows: &[Row], sort: SortKey) -> String {
    let mut rows = rows.to_vec();
    sort_rows(&mut rows, sort);

    let mut builder = Builder::default();
    builder.push_record(HEADERS);
    for row in &rows {
        builder.push_record(describe(row).texts());
    }
    builder.build().with(Style::modern()).to_string()
}

impl OverviewCommand {
    fn from_file(&self, path: &Path) -> Result<()> {
        let config = BkpConfig::load()?;
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(
            &feeds,
            SettingsResolver::new(config.settings_defaults).into_arc(),
        );
        feeds.publish_snapshot(load_snapshot(path)?);
        println!("{}", render_table(&overview.current_rows(), self.sort.into()));
        Ok(())
    }

    fn from_server(&self) -> Result<()> {
        let remote = Remote::connect(self.server.as_ref())?;
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(
            &feeds,
            SettingsResolver::new(remote.config.settings_defaults.clone()).into_arc(),
        );
        let poller = Poller::new(remote.backend.clone(), feeds, remote.config.poll_interval());
        let sort = self.sort.into();

        Runtime::new()?.block_on(async move {
            poller.poll_once().await;
            if !self.watch {
                println!("{}", render_table(&overview.current_rows(), sort));
                return Ok(());
            }

            let _subscription = overview
                .rows()
                .subscribe(move |rows| println!("{}", render_table(rows, sort)));
            let handle = poller.spawn();
            tokio::signal::ctrl_c().await?;
            debug!("stopping the poller");
            handle.abort();
            Ok(())
        })
    }
}

impl BkpCommand for OverviewCommand {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn exec(self) -> Result<()> {
        debug!(
            "running overview subcommand with --sort: {:?} --watch: {}",
            self.sort, self.watch
        );
        match &self.file {
            Some(path) => self.from_file(path),
            None => self.from_server(),
        }
    }
}

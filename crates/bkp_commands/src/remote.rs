use crate::console::{ConsoleNavigator, ConsoleNotifier, PromptConfirm};
use anyhow::{Result, anyhow, bail};
use bkp_config::BkpConfig;
use bkp_core::actions::ActionCoordinator;
use bkp_core::backend::BackupBackend;
use bkp_http::HttpClient;
use bkp_models::dtos::Job;
use bkp_utils::sync::IntoArc;
use std::sync::Arc;
use tracing::debug;

/// A configured server and the client talking to it.
pub struct Remote {
    pub config: BkpConfig,
    pub backend: Arc<HttpClient>,
    pub base_url: String,
}

impl Remote {
    pub fn connect(server: Option<&String>) -> Result<Self> {
        let config = BkpConfig::load()?;
        let remote = config.server_or_first(server)?;
        debug!("using server {} at {}", remote.name, remote.base_url());
        let base_url = remote.base_url();
        let backend = HttpClient::for_server(remote)?.into_arc();
        Ok(Self {
            config,
            backend,
            base_url,
        })
    }

    pub fn coordinator(&self, assume_yes: bool) -> ActionCoordinator {
        ActionCoordinator::new(
            self.backend.clone(),
            PromptConfirm::new(assume_yes).into_arc(),
            ConsoleNavigator::new(self.base_url.clone()).into_arc(),
            ConsoleNotifier.into_arc(),
        )
    }

    pub async fn jobs(&self) -> Result<Vec<Job>> {
        let (jobs, metadata_jobs) = tokio::join!(
            self.backend.backup_jobs(),
            self.backend.metadata_backup_jobs()
        );
        let mut jobs = jobs?;
        jobs.extend(metadata_jobs?);
        Ok(jobs)
    }

    pub async fn find_job(&self, id: &str) -> Result<Job> {
        find_job(self.jobs().await?, id)
    }
}

/// Finds a job by its id or by a prefix matching exactly one job.
pub fn find_job(jobs: Vec<Job>, id: &str) -> Result<Job> {
    if let Some(job) = jobs.iter().find(|j| j.id == id) {
        return Ok(job.clone());
    }

    let mut matching = jobs.into_iter().filter(|j| j.id.starts_with(id));
    match (matching.next(), matching.next()) {
        (Some(job), None) => Ok(job),
        (Some(_), Some(_)) => bail!("more than one job starts with {id}"),
        _ => Err(anyhow!("job {id} not found")),
    }
}

/// Resolves every id to a job, each job selected once in the order of
/// its first mention.
pub fn select_jobs(jobs: Vec<Job>, ids: &[String]) -> Result<Vec<Job>> {
    let mut selection: Vec<Job> = vec![];
    for id in ids {
        let job = find_job(jobs.clone(), id)?;
        if selection.iter().all(|j| j.id != job.id) {
            selection.push(job);
        }
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> Vec<Job> {
        ["2a1c6e3f", "2a1c6e3f-extra", "9b7d0000"]
            .iter()
            .map(|id| Job {
                id: id.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn exact_id_wins_over_prefix() {
        assert_eq!(find_job(jobs(), "2a1c6e3f").unwrap().id, "2a1c6e3f");
    }

    #[test]
    fn unique_prefix_is_accepted() {
        assert_eq!(find_job(jobs(), "9b").unwrap().id, "9b7d0000");
    }

    #[test]
    fn ambiguous_or_unknown_ids_are_refused() {
        assert!(find_job(jobs(), "2a").is_err());
        assert!(find_job(jobs(), "ff").is_err());
    }

    #[test]
    fn repeated_ids_select_the_job_once() {
        let ids = ["9b", "2a1c6e3f", "9b7d0000", "2a1c6e3f"].map(String::from);
        let selection = select_jobs(jobs(), &ids).unwrap();
        assert_eq!(
            selection.iter().map(|j| j.id.as_str()).collect::<Vec<_>>(),
            vec!["9b7d0000", "2a1c6e3f"]
        );
    }

    #[test]
    fn selection_fails_on_any_unknown_id() {
        let ids = ["9b", "ff"].map(String::from);
        assert!(select_jobs(jobs(), &ids).is_err());
    }
}

use crate::{
    backend::BackupBackend,
    navigation::NavigationTarget,
    pattern::construct_query_string,
    rows::{ScheduleToggle, slice_chars},
};
use anyhow::{Result, bail};
use async_trait::async_trait;
use bkp_models::dtos::{DeleteJobsRequest, Job, JobType, RunJobRequest};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Dismissed,
}

/// Asks the user to accept or dismiss an operation. Waits as long as the
/// user needs.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, request: ConfirmRequest) -> Decision;
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, target: NavigationTarget) -> Result<()>;
}

pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The request was accepted by the backend or the router.
    Dispatched,
    /// The user dismissed the confirmation.
    Aborted,
    /// Nothing to do.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    MatchingVms,
    Edit,
}

/// Splits a selection of jobs into the ids of a single delete request.
pub fn partition_by_type<'a, I>(jobs: I) -> DeleteJobsRequest
where
    I: IntoIterator<Item = &'a Job>,
{
    let mut request = DeleteJobsRequest::default();
    for job in jobs {
        match job.job_type {
            JobType::Backup => request.backup_ids.push(job.id.clone()),
            JobType::MetadataBackup => request.metadata_backup_ids.push(job.id.clone()),
        }
    }
    request
}

pub fn navigation_target(job: &Job, request: NavigationRequest) -> Result<NavigationTarget> {
    match request {
        NavigationRequest::MatchingVms => {
            if job.job_type != JobType::Backup {
                bail!("matching VMs are only available for backup jobs");
            }
            Ok(NavigationTarget::path("/home")
                .with_query("t", "VM")
                .with_query("s", &construct_query_string(job.vms.as_ref())))
        }
        NavigationRequest::Edit => Ok(NavigationTarget::path(&format!("/backup/{}/edit", job.id))),
    }
}

pub fn run_confirmation(job: &Job) -> ConfirmRequest {
    ConfirmRequest {
        title: "Run job".to_string(),
        body: format!(
            "Are you sure you want to run {} ({})?",
            job.name,
            slice_chars(&job.id, 0, 5)
        ),
    }
}

/// Entry point of every user triggered operation of the overview.
pub struct ActionCoordinator {
    backend: Arc<dyn BackupBackend>,
    confirm: Arc<dyn Confirm>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ActionCoordinator {
    pub fn new(
        backend: Arc<dyn BackupBackend>,
        confirm: Arc<dyn Confirm>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            confirm,
            navigator,
            notifier,
        }
    }

    fn surface(&self, action: &str, result: Result<()>) -> Result<ActionOutcome> {
        match result {
            Ok(()) => {
                debug!("{action} dispatched");
                Ok(ActionOutcome::Dispatched)
            }
            Err(e) => {
                let message = format!("{action} failed: {e}");
                error!("{message}");
                self.notifier.notify_error(&message);
                Err(e.context(format!("{action} failed")))
            }
        }
    }

    pub async fn run_job(&self, job: &Job, schedule: Option<&str>) -> Result<ActionOutcome> {
        if self.confirm.confirm(run_confirmation(job)).await == Decision::Dismissed {
            debug!("run of job {} dismissed", job.id);
            return Ok(ActionOutcome::Aborted);
        }

        let request = RunJobRequest::new(&job.id, schedule);
        let result = match job.job_type {
            JobType::Backup => self.backend.run_backup_job(&request).await,
            JobType::MetadataBackup => self.backend.run_metadata_backup_job(&request).await,
        };
        self.surface(&format!("run of job {}", job.id), result)
    }

    pub async fn cancel_job(&self, job: &Job) -> Result<ActionOutcome> {
        if !job.is_running() {
            debug!("job {} is not running, nothing to cancel", job.id);
            return Ok(ActionOutcome::Skipped);
        }
        let result = self.backend.cancel_job(job).await;
        self.surface(&format!("cancel of job {}", job.id), result)
    }

    pub async fn delete_jobs<'a, I>(&self, selection: I) -> Result<ActionOutcome>
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let request = partition_by_type(selection);
        if request.is_empty() {
            return Ok(ActionOutcome::Skipped);
        }
        let result = self.backend.delete_backup_jobs(&request).await;
        let count = request.backup_ids.len() + request.metadata_backup_ids.len();
        self.surface(&format!("delete of {count} jobs"), result)
    }

    pub async fn toggle_schedule(
        &self,
        schedule_id: &str,
        toggle: ScheduleToggle,
    ) -> Result<ActionOutcome> {
        let (action, result) = match toggle {
            ScheduleToggle::Enable => (
                "enabling",
                self.backend.enable_schedule(schedule_id).await,
            ),
            ScheduleToggle::Disable => (
                "disabling",
                self.backend.disable_schedule(schedule_id).await,
            ),
        };
        self.surface(&format!("{action} of schedule {schedule_id}"), result)
    }

    pub fn navigate(&self, job: &Job, request: NavigationRequest) -> Result<ActionOutcome> {
        let target = navigation_target(job, request)?;
        debug!("navigating to {}", target.pathname);
        self.navigator.go_to(target)?;
        Ok(ActionOutcome::Dispatched)
    }
}

use anyhow::Result;
use async_trait::async_trait;
use bkp_models::dtos::{DeleteJobsRequest, Job, Log, RunJobRequest, Schedule};

/// The server owning jobs, schedules and logs. Every call either resolves or
/// rejects; nothing is retried by the caller.
#[async_trait]
pub trait BackupBackend: Send + Sync {
    async fn backup_jobs(&self) -> Result<Vec<Job>>;

    async fn metadata_backup_jobs(&self) -> Result<Vec<Job>>;

    async fn schedules(&self) -> Result<Vec<Schedule>>;

    async fn backup_logs(&self) -> Result<Vec<Log>>;

    async fn run_backup_job(&self, request: &RunJobRequest) -> Result<()>;

    async fn run_metadata_backup_job(&self, request: &RunJobRequest) -> Result<()>;

    async fn cancel_job(&self, job: &Job) -> Result<()>;

    async fn delete_backup_jobs(&self, request: &DeleteJobsRequest) -> Result<()>;

    async fn enable_schedule(&self, id: &str) -> Result<()>;

    async fn disable_schedule(&self, id: &str) -> Result<()>;
}

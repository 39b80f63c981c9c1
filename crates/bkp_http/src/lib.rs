use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use bkp_config::{BkpConfig, BkpRemoteServerConfig};
use bkp_core::backend::BackupBackend;
use bkp_models::dtos::{DeleteJobsRequest, Job, Log, RpcRequest, RpcResponse, RunJobRequest, Schedule};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

const AUTH_COOKIE: &str = "authenticationToken";

pub mod methods {
    pub const BACKUP_GET_ALL_JOBS: &str = "backupNg.getAllJobs";
    pub const BACKUP_GET_ALL_LOGS: &str = "backupNg.getAllLogs";
    pub const BACKUP_RUN_JOB: &str = "backupNg.runJob";
    pub const BACKUP_DELETE_JOB: &str = "backupNg.deleteJob";
    pub const METADATA_GET_ALL_JOBS: &str = "metadataBackup.getAllJobs";
    pub const METADATA_RUN_JOB: &str = "metadataBackup.runJob";
    pub const METADATA_DELETE_JOB: &str = "metadataBackup.deleteJob";
    pub const SCHEDULE_GET_ALL: &str = "schedule.getAll";
    pub const SCHEDULE_SET: &str = "schedule.set";
    pub const JOB_CANCEL: &str = "job.cancel";
}

/// Builders of the JSON-RPC method and params of every backend action.
pub mod calls {
    use super::methods;
    use anyhow::{Result, anyhow};
    use bkp_models::dtos::{
        CancelJobRequest, DeleteJobsRequest, IdParams, Job, RunJobRequest, ScheduleStateRequest,
    };
    use serde_json::Value;

    pub type Call = (&'static str, Value);

    pub fn run_backup_job(request: &RunJobRequest) -> Result<Call> {
        Ok((methods::BACKUP_RUN_JOB, serde_json::to_value(request)?))
    }

    pub fn run_metadata_backup_job(request: &RunJobRequest) -> Result<Call> {
        Ok((methods::METADATA_RUN_JOB, serde_json::to_value(request)?))
    }

    pub fn cancel_job(job: &Job) -> Result<Call> {
        let run_id = job
            .run_id
            .clone()
            .ok_or_else(|| anyhow!("job {} is not running", job.id))?;
        Ok((
            methods::JOB_CANCEL,
            serde_json::to_value(CancelJobRequest { run_id })?,
        ))
    }

    /// One call per id, backup jobs first, paired with the deleted id.
    pub fn delete_jobs(request: &DeleteJobsRequest) -> Result<Vec<(String, Call)>> {
        let backups = request
            .backup_ids
            .iter()
            .map(|id| (methods::BACKUP_DELETE_JOB, id));
        let metadata = request
            .metadata_backup_ids
            .iter()
            .map(|id| (methods::METADATA_DELETE_JOB, id));

        backups
            .chain(metadata)
            .map(|(method, id)| {
                let params = serde_json::to_value(IdParams { id: id.clone() })?;
                Ok((id.clone(), (method, params)))
            })
            .collect()
    }

    pub fn schedule_state(id: &str, enabled: bool) -> Result<Call> {
        let params = ScheduleStateRequest {
            id: id.to_owned(),
            enabled,
        };
        Ok((methods::SCHEDULE_SET, serde_json::to_value(params)?))
    }
}

/// Sends every delete at once and reports all the rejected ids together.
async fn delete_all<F, Fut>(deletes: Vec<(String, calls::Call)>, send: F) -> Result<()>
where
    F: Fn(&'static str, Value) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let total = deletes.len();
    let results = join_all(deletes.into_iter().map(|(id, (method, params))| {
        let sent = send(method, params);
        async move { (id, sent.await) }
    }))
    .await;

    let failures = results
        .into_iter()
        .filter_map(|(id, result)| result.err().map(|e| format!("{id}: {e}")))
        .collect::<Vec<_>>();
    if failures.is_empty() {
        return Ok(());
    }
    error!("{} of {total} deletes were rejected", failures.len());
    bail!(
        "unable to delete {} of {total} jobs ({})",
        failures.len(),
        failures.join(", ")
    )
}

#[derive(Debug)]
pub enum RequestError {
    Status { status: StatusCode, text: String },
    Rpc { method: String, message: String },
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, text } => write!(f, "response {status}: {text}"),
            Self::Rpc { method, message } => write!(f, "{method} rejected: {message}"),
        }
    }
}

impl Error for RequestError {}

/// Logs are returned either keyed by run id or as a plain list.
#[derive(Deserialize)]
#[serde(untagged)]
enum LogCollection {
    Keyed(HashMap<String, Log>),
    List(Vec<Log>),
}

impl LogCollection {
    fn into_sorted(self) -> Vec<Log> {
        let mut logs = match self {
            Self::Keyed(logs) => logs
                .into_iter()
                .map(|(run_id, mut log)| {
                    if log.id.is_empty() {
                        log.id = run_id;
                    }
                    log
                })
                .collect(),
            Self::List(logs) => logs,
        };
        logs.sort_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));
        logs
    }
}

pub fn parse_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T> {
    let response: RpcResponse<Value> = serde_json::from_str(body)?;
    if let Some(e) = response.error {
        return Err(RequestError::Rpc {
            method: method.to_owned(),
            message: e.to_string(),
        }
        .into());
    }
    let result = response.result.unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| anyhow!("invalid result of {method}: {e}"))
}

/// JSON-RPC client of the console server.
pub struct HttpClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    next_id: AtomicU64,
}

impl HttpClient {
    pub fn new(config: &BkpConfig, server: Option<&String>) -> Result<Self> {
        let server = config.server_or_first(server)?;
        Self::for_server(server)
    }

    pub fn for_server(server: &BkpRemoteServerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("bkp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: server.api_url(),
            token: server.token.clone(),
            next_id: AtomicU64::new(0),
        })
    }

    pub async fn call<P, T>(&self, method: &str, params: P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        debug!("sending {method} (id {id}) to {}", self.api_url);

        let mut builder = self.client.post(&self.api_url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::COOKIE, format!("{AUTH_COOKIE}={token}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("response from server status: {status}");

        if !status.is_success() {
            error!("{method} failed with status {status}");
            return Err(RequestError::Status { status, text: body }.into());
        }
        parse_response(method, &body)
    }

    async fn call_unit<P: Serialize>(&self, method: &str, params: P) -> Result<()> {
        self.call::<P, Value>(method, params).await.map(|_| ())
    }
}

#[async_trait]
impl BackupBackend for HttpClient {
    async fn backup_jobs(&self) -> Result<Vec<Job>> {
        self.call(methods::BACKUP_GET_ALL_JOBS, json!({})).await
    }

    async fn metadata_backup_jobs(&self) -> Result<Vec<Job>> {
        self.call(methods::METADATA_GET_ALL_JOBS, json!({})).await
    }

    async fn schedules(&self) -> Result<Vec<Schedule>> {
        self.call(methods::SCHEDULE_GET_ALL, json!({})).await
    }

    async fn backup_logs(&self) -> Result<Vec<Log>> {
        let logs: LogCollection = self.call(methods::BACKUP_GET_ALL_LOGS, json!({})).await?;
        Ok(logs.into_sorted())
    }

    async fn run_backup_job(&self, request: &RunJobRequest) -> Result<()> {
        let (method, params) = calls::run_backup_job(request)?;
        self.call_unit(method, params).await
    }

    async fn run_metadata_backup_job(&self, request: &RunJobRequest) -> Result<()> {
        let (method, params) = calls::run_metadata_backup_job(request)?;
        self.call_unit(method, params).await
    }

    async fn cancel_job(&self, job: &Job) -> Result<()> {
        let (method, params) = calls::cancel_job(job)?;
        self.call_unit(method, params).await
    }

    async fn delete_backup_jobs(&self, request: &DeleteJobsRequest) -> Result<()> {
        delete_all(calls::delete_jobs(request)?, |method, params| {
            self.call_unit(method, params)
        })
        .await
    }

    async fn enable_schedule(&self, id: &str) -> Result<()> {
        let (method, params) = calls::schedule_state(id, true)?;
        self.call_unit(method, params).await
    }

    async fn disable_schedule(&self, id: &str) -> Result<()> {
        let (method, params) = calls::schedule_state(id, false)?;
        self.call_unit(method, params).await
    }
}

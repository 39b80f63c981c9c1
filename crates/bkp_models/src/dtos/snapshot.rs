use crate::dtos::{Job, Log, Schedule};
use serde::{Deserialize, Serialize};

/// Every collection the overview is derived from, captured at one point in
/// time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverviewSnapshot {
    pub jobs: Vec<Job>,
    pub metadata_jobs: Vec<Job>,
    pub schedules: Vec<Schedule>,
    pub logs: Vec<Log>,
}

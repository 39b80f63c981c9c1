use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunJobRequest {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl RunJobRequest {
    pub fn new(id: &str, schedule: Option<&str>) -> Self {
        Self {
            id: id.to_owned(),
            schedule: schedule.map(|s| s.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelJobRequest {
    pub run_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteJobsRequest {
    pub backup_ids: Vec<String>,
    pub metadata_backup_ids: Vec<String>,
}

impl DeleteJobsRequest {
    pub fn is_empty(&self) -> bool {
        self.backup_ids.is_empty() && self.metadata_backup_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStateRequest {
    pub id: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdParams {
    pub id: String,
}

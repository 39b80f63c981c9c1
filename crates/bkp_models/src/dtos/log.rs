use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogStatus {
    Success,
    Failure,
    Interrupted,
    Pending,
    Skipped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Display for LogStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "Successful",
            Self::Failure => "Failed",
            Self::Interrupted => "Interrupted",
            Self::Pending => "In progress",
            Self::Skipped => "Skipped",
            Self::Unknown => "Unknown",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(default)]
    pub start: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,

    #[serde(default)]
    pub status: LogStatus,
}

impl Log {
    pub fn belongs_to(&self, schedule_id: &str) -> bool {
        self.schedule_id.as_deref() == Some(schedule_id)
    }
}

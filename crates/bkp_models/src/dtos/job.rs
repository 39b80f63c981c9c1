use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display, Formatter};

/// Key of the settings entry that applies to the job as a whole rather than
/// to one of its schedules.
pub const DEFAULT_SETTINGS_KEY: &str = "";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobType {
    #[default]
    Backup,
    MetadataBackup,
}

impl Display for JobType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => write!(f, "backup"),
            Self::MetadataBackup => write!(f, "metadataBackup"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobMode {
    Full,
    Delta,
}

impl Display for JobMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Delta => write!(f, "delta"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_interval: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_snapshot: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_when: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_retention: Option<u64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JobSettings {
    /// Returns a copy of `self` where every field present in `other` replaces
    /// the value of `self`.
    pub fn overlaid_with(&self, other: &JobSettings) -> JobSettings {
        let mut extra = self.extra.clone();
        extra.extend(other.extra.clone());
        JobSettings {
            compression: other.compression.clone().or_else(|| self.compression.clone()),
            concurrency: other.concurrency.or(self.concurrency),
            full_interval: other.full_interval.or(self.full_interval),
            offline_snapshot: other.offline_snapshot.or(self.offline_snapshot),
            report_when: other.report_when.clone().or_else(|| self.report_when.clone()),
            timeout: other.timeout.or(self.timeout),
            snapshot_retention: other.snapshot_retention.or(self.snapshot_retention),
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub job_type: JobType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<JobMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    #[serde(default)]
    pub settings: HashMap<String, JobSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remotes: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srs: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vms: Option<Value>,

    #[serde(default)]
    pub xo_metadata: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Job {
    pub fn is_running(&self) -> bool {
        self.run_id.is_some()
    }

    pub fn default_settings(&self) -> Option<&JobSettings> {
        self.settings.get(DEFAULT_SETTINGS_KEY)
    }

    /// The job level compression overlaid with the unkeyed settings entry.
    pub fn base_settings(&self) -> JobSettings {
        let base = JobSettings {
            compression: self.compression.clone(),
            ..Default::default()
        };
        match self.default_settings() {
            Some(settings) => base.overlaid_with(settings),
            None => base,
        }
    }
}

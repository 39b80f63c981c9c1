use crate::definitions;
use bkp_models::dtos::JobMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Values a job setting takes when it was never changed for a given mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModeSettingsDefaults {
    #[serde(default)]
    pub compression: Option<String>,

    #[serde(default = "ModeSettingsDefaults::default_concurrency")]
    pub concurrency: u64,

    #[serde(default = "ModeSettingsDefaults::default_full_interval")]
    pub full_interval: u64,

    #[serde(default = "ModeSettingsDefaults::default_offline_snapshot")]
    pub offline_snapshot: bool,

    #[serde(default = "ModeSettingsDefaults::default_report_when")]
    pub report_when: String,

    #[serde(default = "ModeSettingsDefaults::default_timeout")]
    pub timeout: u64,
}

impl ModeSettingsDefaults {
    fn default_concurrency() -> u64 {
        definitions::DEFAULT_CONCURRENCY
    }

    fn default_full_interval() -> u64 {
        definitions::DEFAULT_FULL_INTERVAL
    }

    fn default_offline_snapshot() -> bool {
        definitions::DEFAULT_OFFLINE_SNAPSHOT
    }

    fn default_report_when() -> String {
        definitions::DEFAULT_REPORT_WHEN.to_owned()
    }

    fn default_timeout() -> u64 {
        definitions::DEFAULT_TIMEOUT
    }

    pub fn full() -> Self {
        Self {
            compression: Some(definitions::DEFAULT_FULL_COMPRESSION.to_owned()),
            ..Default::default()
        }
    }
}

impl Default for ModeSettingsDefaults {
    fn default() -> Self {
        Self {
            compression: None,
            concurrency: Self::default_concurrency(),
            full_interval: Self::default_full_interval(),
            offline_snapshot: Self::default_offline_snapshot(),
            report_when: Self::default_report_when(),
            timeout: Self::default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDefaults {
    #[serde(default = "ModeSettingsDefaults::full")]
    pub full: ModeSettingsDefaults,

    #[serde(default)]
    pub delta: ModeSettingsDefaults,

    /// Used for jobs without a mode, such as metadata backups.
    #[serde(default)]
    pub metadata: ModeSettingsDefaults,
}

impl SettingsDefaults {
    pub fn for_mode(&self, mode: Option<JobMode>) -> &ModeSettingsDefaults {
        match mode {
            Some(JobMode::Full) => &self.full,
            Some(JobMode::Delta) => &self.delta,
            None => &self.metadata,
        }
    }

    pub fn debug_info(&self) {
        for (mode, defaults) in [
            ("full", &self.full),
            ("delta", &self.delta),
            ("metadata", &self.metadata),
        ] {
            debug!(
                "settings-defaults > {mode}: compression {:?}, concurrency {}, full-interval {}, offline-snapshot {}, report-when {}, timeout {}",
                defaults.compression,
                defaults.concurrency,
                defaults.full_interval,
                defaults.offline_snapshot,
                defaults.report_when,
                defaults.timeout
            );
        }
    }
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            full: ModeSettingsDefaults::full(),
            delta: ModeSettingsDefaults::default(),
            metadata: ModeSettingsDefaults::default(),
        }
    }
}

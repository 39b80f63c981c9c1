use bkp_config::SettingsDefaults;
use bkp_models::dtos::{JobMode, JobSettings};
use serde::Serialize;

pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// The job settings that differ from the defaults of the job's mode. Absent
/// fields are not displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonDefaultSettings {
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

    /// Converted from milliseconds to hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

impl NonDefaultSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn differs<T: PartialEq>(value: Option<T>, default: Option<&T>) -> Option<T> {
    value.filter(|v| Some(v) != default)
}

#[derive(Debug, Clone, Default)]
pub struct SettingsResolver {
    defaults: SettingsDefaults,
}

impl SettingsResolver {
    pub fn new(defaults: SettingsDefaults) -> Self {
        Self { defaults }
    }

    pub fn resolve_non_default(
        &self,
        mode: Option<JobMode>,
        settings: &JobSettings,
    ) -> NonDefaultSettings {
        let defaults = self.defaults.for_mode(mode);
        NonDefaultSettings {
            compression: differs(settings.compression.clone(), defaults.compression.as_ref()),
            concurrency: differs(settings.concurrency, Some(&defaults.concurrency)),
            full_interval: differs(settings.full_interval, Some(&defaults.full_interval)),
            offline_snapshot: differs(settings.offline_snapshot, Some(&defaults.offline_snapshot)),
            report_when: differs(settings.report_when.clone(), Some(&defaults.report_when)),
            timeout: differs(settings.timeout, Some(&defaults.timeout))
                .map(|ms| ms as f64 / MS_PER_HOUR),
        }
    }
}

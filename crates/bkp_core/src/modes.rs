use crate::pattern::resolve_ids;
use bkp_models::dtos::{Job, JobMode};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// What a job does, as shown to the user. A job may match several modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    RollingSnapshot,
    Backup,
    DeltaBackup,
    ContinuousReplication,
    DisasterRecovery,
    PoolMetadata,
    XoConfig,
}

impl Mode {
    /// Every mode, in the order they are tested and displayed.
    pub const ALL: [Mode; 7] = [
        Mode::RollingSnapshot,
        Mode::Backup,
        Mode::DeltaBackup,
        Mode::ContinuousReplication,
        Mode::DisasterRecovery,
        Mode::PoolMetadata,
        Mode::XoConfig,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RollingSnapshot => "rollingSnapshot",
            Self::Backup => "backup",
            Self::DeltaBackup => "deltaBackup",
            Self::ContinuousReplication => "continuousReplication",
            Self::DisasterRecovery => "disasterRecovery",
            Self::PoolMetadata => "poolMetadata",
            Self::XoConfig => "xoConfig",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::RollingSnapshot => "Rolling Snapshot",
            Self::Backup => "Backup",
            Self::DeltaBackup => "Delta Backup",
            Self::ContinuousReplication => "Continuous Replication",
            Self::DisasterRecovery => "Disaster Recovery",
            Self::PoolMetadata => "Pool Metadata",
            Self::XoConfig => "XO Config",
        }
    }

    fn applies_to(&self, job: &Job, targets: &Targets) -> bool {
        match self {
            Self::RollingSnapshot => job
                .settings
                .values()
                .any(|s| s.snapshot_retention.is_some_and(|r| r > 0)),
            Self::Backup => job.mode == Some(JobMode::Full) && targets.has_remotes,
            Self::DeltaBackup => job.mode == Some(JobMode::Delta) && targets.has_remotes,
            Self::ContinuousReplication => job.mode == Some(JobMode::Delta) && targets.has_srs,
            Self::DisasterRecovery => job.mode == Some(JobMode::Full) && targets.has_srs,
            Self::PoolMetadata => targets.has_pools,
            Self::XoConfig => job.xo_metadata,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

struct Targets {
    has_remotes: bool,
    has_srs: bool,
    has_pools: bool,
}

impl Targets {
    fn resolve(job: &Job) -> Self {
        Self {
            has_remotes: !resolve_ids(job.remotes.as_ref()).is_empty(),
            has_srs: !resolve_ids(job.srs.as_ref()).is_empty(),
            has_pools: !resolve_ids(job.pools.as_ref()).is_empty(),
        }
    }
}

/// Returns every mode matching `job`, in declaration order.
pub fn classify(job: &Job) -> Vec<Mode> {
    let targets = Targets::resolve(job);
    Mode::ALL
        .into_iter()
        .filter(|mode| mode.applies_to(job, &targets))
        .collect()
}

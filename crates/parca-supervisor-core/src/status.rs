use serde::Serialize;

use crate::Revision;

pub const NO_STORE_MESSAGE: &str =
    "no store configured; relate with a store provider to start sending profiles";
pub const NOT_INSTALLED_MESSAGE: &str = "package not installed; check logs for setup errors";
pub const NOT_RUNNING_MESSAGE: &str = "package not running; check service logs for errors";
pub const REVISION_MISMATCH_MESSAGE: &str = "revision mismatch, hinting at an upgrade error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum UnitStatus {
    Active(String),
    Blocked(String),
    Maintenance(String),
}

impl UnitStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active(_) => "active",
            Self::Blocked(_) => "blocked",
            Self::Maintenance(_) => "maintenance",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Active(message) | Self::Blocked(message) | Self::Maintenance(message) => message,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// What the package manager reports about the managed package right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservedPackageState {
    pub present: bool,
    pub revision: Option<Revision>,
    pub running: bool,
    pub target_revision: Option<Revision>,
}

impl ObservedPackageState {
    pub fn with_store(self, has_store_config: bool) -> StatusObservation {
        StatusObservation {
            has_store_config,
            installed: self.present,
            running: self.running,
            target_revision: self.target_revision,
            current_revision: self.revision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusObservation {
    pub has_store_config: bool,
    pub installed: bool,
    pub running: bool,
    pub target_revision: Option<Revision>,
    pub current_revision: Option<Revision>,
}

/// Maps an observation to a single status. Checks run in priority order and
/// the first failing one wins, so each message assumes the ones above passed.
pub fn summarize(observation: &StatusObservation) -> UnitStatus {
    if !observation.has_store_config {
        return UnitStatus::Blocked(NO_STORE_MESSAGE.to_string());
    }
    if !observation.installed {
        return UnitStatus::Blocked(NOT_INSTALLED_MESSAGE.to_string());
    }
    if !observation.running {
        return UnitStatus::Blocked(NOT_RUNNING_MESSAGE.to_string());
    }
    if observation.target_revision != observation.current_revision {
        return UnitStatus::Blocked(REVISION_MISMATCH_MESSAGE.to_string());
    }
    UnitStatus::Active(String::new())
}

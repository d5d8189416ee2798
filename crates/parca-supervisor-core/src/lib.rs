mod arch;
mod error;
mod event;
mod revision;
mod status;
mod store;
mod version;

pub use arch::Arch;
pub use error::{PackageError, SupervisorError};
pub use event::{handle_event, Action, AgentEvent};
pub use revision::{lookup_revision, Confinement, Revision};
pub use status::{
    summarize, ObservedPackageState, StatusObservation, UnitStatus, NOT_INSTALLED_MESSAGE,
    NOT_RUNNING_MESSAGE, NO_STORE_MESSAGE, REVISION_MISMATCH_MESSAGE,
};
pub use store::{
    DesiredState, StoreConfig, REMOTE_STORE_ADDRESS, REMOTE_STORE_BEARER_TOKEN,
    REMOTE_STORE_INSECURE, STORE_CONFIG_KEYS,
};
pub use version::parse_version_banner;

#[cfg(test)]
mod tests;

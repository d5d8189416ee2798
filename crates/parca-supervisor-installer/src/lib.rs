mod certs;
mod command;
mod config;
mod dispatch;
mod fs_utils;
mod host;
mod layout;
mod lifecycle;
mod package;
mod restart;
mod snap;

pub use certs::{render_ca_bundle, CertificateOutcome, CertificateReconciler};
pub use config::{reconcile_store_config, ConfigOutcome};
pub use dispatch::DispatchReport;
pub use host::{
    detect_host_arch, detect_host_arch_with_executor, HostTools, SystemHostTools, SCRAPE_PORT,
};
pub use layout::{validate_owner_id, HostLayout};
pub use lifecycle::{LifecycleController, ReconcileReport};
pub use package::{InstalledPackage, ManagedPackage, PackageState};
pub use restart::PendingRestart;
pub use snap::{CommandExecutor, SnapPackage, AGENT_BINARY, SNAP_NAME, SNAP_SERVICE};

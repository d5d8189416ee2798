use anyhow::{Context, Result};

use parca_supervisor_core::{
    lookup_revision, parse_version_banner, summarize, Arch, Confinement, DesiredState,
    ObservedPackageState, PackageError, Revision, SupervisorError, UnitStatus,
};
use tracing::{error, info, warn};

use crate::restart::{clear_pending_restart, read_pending_restart, record_pending_restart};
use crate::{
    reconcile_store_config, CertificateOutcome, CertificateReconciler, ConfigOutcome, HostLayout,
    HostTools, ManagedPackage, PackageState, PendingRestart, SNAP_SERVICE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Set when no store is configured and the pass did nothing.
    pub skipped: bool,
    /// Restart left owed by an earlier pass that failed part way.
    pub resumed: Option<PendingRestart>,
    pub certificates: Option<CertificateOutcome>,
    /// Set when the agent was stopped and started to load CA changes.
    pub stop_started: bool,
    pub config: Option<ConfigOutcome>,
}

impl ReconcileReport {
    pub fn restarts(&self) -> usize {
        let config_restart = self
            .config
            .as_ref()
            .is_some_and(|outcome| outcome.restarted);
        usize::from(self.stop_started) + usize::from(config_restart)
    }
}

/// Drives the agent package: install, refresh, start/stop, removal, and the
/// convergence pass over certificates and store config.
pub struct LifecycleController<P, H> {
    package: P,
    host: H,
    layout: HostLayout,
    owner: String,
    arch: Arch,
    confinement: Confinement,
}

impl<P, H> LifecycleController<P, H>
where
    P: ManagedPackage,
    H: HostTools,
{
    pub fn new(package: P, host: H, layout: HostLayout, owner: impl Into<String>, arch: Arch) -> Self {
        Self {
            package,
            host,
            layout,
            owner: owner.into(),
            arch,
            confinement: Confinement::Classic,
        }
    }

    pub fn package(&self) -> &P {
        &self.package
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn target_revision(&self) -> Option<Revision> {
        lookup_revision(self.confinement, &self.arch)
    }

    /// Installs the catalogued revision for this host and holds it there.
    pub fn install(&mut self) -> Result<Revision, SupervisorError> {
        let revision = self
            .target_revision()
            .ok_or_else(|| SupervisorError::UnsupportedPlatform {
                confinement: self.confinement,
                arch: self.arch.clone(),
            })?;

        let classic = self.confinement.is_classic();
        self.package
            .ensure(PackageState::Present, Some(revision), classic)
            .and_then(|()| self.package.hold())
            .map_err(|err| {
                error!("could not install parca-agent: {err}");
                SupervisorError::from(err)
            })?;
        info!(revision, arch = %self.arch, "parca-agent installed and held");
        Ok(revision)
    }

    /// Re-applying the target revision is idempotent, so refresh is install.
    pub fn refresh(&mut self) -> Result<Revision, SupervisorError> {
        self.install()
    }

    pub fn start(&mut self) -> Result<(), SupervisorError> {
        self.package.start(true)?;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SupervisorError> {
        self.package.stop(true)?;
        Ok(())
    }

    /// Removes the package without purging its saved config and data.
    pub fn remove(&mut self) -> Result<(), SupervisorError> {
        self.package.ensure(PackageState::Absent, None, false)?;
        Ok(())
    }

    pub fn hold(&mut self) -> Result<(), SupervisorError> {
        self.package.hold()?;
        Ok(())
    }

    /// Converges certificates, then store config.
    ///
    /// Certificate changes need a full stop/start because the agent only loads
    /// CA trust at process start. Config changes restart on their own, so a
    /// pass that changes both restarts twice.
    ///
    /// An owed restart is recorded under the state directory before the change
    /// it belongs to is committed and cleared once the restart succeeds. A pass
    /// that fails in between leaves the marker behind and the next pass
    /// finishes the restart.
    pub fn reconcile(&mut self, desired: &DesiredState) -> Result<ReconcileReport> {
        let Some(store) = desired.store.as_ref() else {
            info!("no store configured, skipping reconcile");
            return Ok(ReconcileReport {
                skipped: true,
                ..ReconcileReport::default()
            });
        };

        let marker = self.layout.restart_pending_path(&self.owner);
        let resumed = read_pending_restart(&marker)?;
        if let Some(pending) = resumed {
            warn!(
                pending = pending.as_str(),
                "resuming restart left over from an earlier pass"
            );
        }

        let reconciler = CertificateReconciler::new(&self.layout, &self.owner);
        if !reconciler.is_current(&desired.ca_certificates)? {
            record_pending_restart(&marker, PendingRestart::StopStart)?;
        }
        let certificates = reconciler.reconcile(&desired.ca_certificates, &mut self.host)?;

        let stop_started = read_pending_restart(&marker)? == Some(PendingRestart::StopStart);
        if stop_started {
            self.package
                .stop(false)
                .context("failed to stop parca-agent after CA change")?;
            self.package
                .start(false)
                .context("failed to start parca-agent after CA change")?;
            clear_pending_restart(&marker)?;
        }

        let config = reconcile_store_config(&mut self.package, &store.to_values(), &marker)?;

        Ok(ReconcileReport {
            skipped: false,
            resumed,
            certificates: Some(certificates),
            stop_started,
            config: Some(config),
        })
    }

    pub fn observe(&self) -> Result<ObservedPackageState, PackageError> {
        let installed = self.package.installed()?;
        let running = match installed {
            Some(_) => self.package.service_active(SNAP_SERVICE)?,
            None => false,
        };
        Ok(ObservedPackageState {
            present: installed.is_some(),
            revision: installed.and_then(|package| package.revision),
            running,
            target_revision: self.target_revision(),
        })
    }

    pub fn status(&self, desired: &DesiredState) -> Result<UnitStatus, PackageError> {
        let observed = self.observe()?;
        Ok(summarize(&observed.with_store(desired.has_store())))
    }

    pub fn workload_version(&self) -> Result<String, SupervisorError> {
        if !self.package.present()? {
            return Err(SupervisorError::NotInstalled);
        }
        let banner = self.package.version_banner()?;
        parse_version_banner(&banner)
    }
}

use anyhow::Result;

use parca_supervisor_core::{
    handle_event, Action, AgentEvent, DesiredState, SupervisorError, UnitStatus,
};
use tracing::{error, info, warn};

use crate::{HostTools, LifecycleController, ManagedPackage, ReconcileReport, SCRAPE_PORT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub event: AgentEvent,
    pub action: Action,
    pub status: UnitStatus,
    pub workload_version: Option<String>,
    pub opened_ports: Vec<u16>,
    pub reconcile: Option<ReconcileReport>,
    pub warnings: Vec<String>,
}

impl DispatchReport {
    fn new(event: AgentEvent, action: Action) -> Self {
        Self {
            event,
            action,
            status: UnitStatus::Maintenance(action.maintenance_message().to_string()),
            workload_version: None,
            opened_ports: Vec::new(),
            reconcile: None,
            warnings: Vec::new(),
        }
    }
}

impl<P, H> LifecycleController<P, H>
where
    P: ManagedPackage,
    H: HostTools,
{
    /// Handles one event end to end: run its action, converge, then derive
    /// the status to report.
    ///
    /// Package manager failures are logged and end the dispatch with a
    /// blocked status carrying the error. Failures inside the convergence pass
    /// propagate and abort it; the next event retries.
    pub fn dispatch(&mut self, event: AgentEvent, desired: &DesiredState) -> Result<DispatchReport> {
        let action = handle_event(&event);
        let mut report = DispatchReport::new(event, action);
        info!(event = event.as_str(), "{}", action.maintenance_message());

        if let Err(err) = self.run_action(action, &mut report) {
            error!(event = event.as_str(), "{err}");
            report.status = UnitStatus::Blocked(err.to_string());
            return Ok(report);
        }

        if action.reconciles() {
            report.reconcile = Some(self.reconcile(desired)?);
        }
        if action != Action::Remove {
            report.status = self.status(desired)?;
        }
        if let Some(certificates) = report
            .reconcile
            .as_ref()
            .and_then(|reconcile| reconcile.certificates.as_ref())
        {
            report.warnings.extend(certificates.warnings.iter().cloned());
        }
        Ok(report)
    }

    fn run_action(
        &mut self,
        action: Action,
        report: &mut DispatchReport,
    ) -> Result<(), SupervisorError> {
        match action {
            Action::Install => {
                self.install()?;
                self.record_workload_version(report);
            }
            Action::Refresh => {
                self.refresh()?;
                self.record_workload_version(report);
            }
            Action::Start => {
                self.start()?;
                match self.host_mut().open_port("tcp", SCRAPE_PORT) {
                    Ok(()) => report.opened_ports.push(SCRAPE_PORT),
                    Err(err) => {
                        let warning = format!("failed to open port {SCRAPE_PORT}/tcp: {err:#}");
                        warn!("{warning}");
                        report.warnings.push(warning);
                    }
                }
            }
            Action::Stop => self.stop()?,
            Action::Remove => self.remove()?,
            Action::HoldAndReport => {
                // Extend the hold every time so the package never refreshes on its own.
                self.hold()?;
                self.record_workload_version(report);
            }
            Action::Reconcile => {}
        }
        Ok(())
    }

    fn record_workload_version(&self, report: &mut DispatchReport) {
        match self.workload_version() {
            Ok(version) => report.workload_version = Some(version),
            Err(err) => {
                let warning = format!("could not determine workload version: {err}");
                warn!("{warning}");
                report.warnings.push(warning);
            }
        }
    }
}

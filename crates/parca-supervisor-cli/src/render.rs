use anstyle::{AnsiColor, Effects, Style};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::IsTerminal;

use parca_supervisor_core::UnitStatus;
use parca_supervisor_installer::{DispatchReport, ReconcileReport};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(std::io::stdout().is_terminal())
}

/// Machine-readable view of a command result. Tokens never reach it: config
/// changes are reported by key name only.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct ReportView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) event: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) action: Option<&'static str>,
    pub(crate) status: &'static str,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) workload_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) opened_ports: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reconcile: Option<ReconcileView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct ReconcileView {
    pub(crate) skipped: bool,
    pub(crate) certificates_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) bundle_sha256: Option<String>,
    pub(crate) changed_config_keys: Vec<String>,
    pub(crate) restarts: usize,
}

impl ReconcileView {
    fn from_report(report: &ReconcileReport) -> Self {
        Self {
            skipped: report.skipped,
            certificates_changed: report
                .certificates
                .as_ref()
                .is_some_and(|outcome| outcome.changed),
            bundle_sha256: report
                .certificates
                .as_ref()
                .and_then(|outcome| outcome.fingerprint.clone()),
            changed_config_keys: report
                .config
                .as_ref()
                .map(|outcome| outcome.changed_keys.clone())
                .unwrap_or_default(),
            restarts: report.restarts(),
        }
    }
}

impl ReportView {
    pub(crate) fn from_status(status: &UnitStatus) -> Self {
        Self {
            event: None,
            action: None,
            status: status.name(),
            message: status.message().to_string(),
            workload_version: None,
            opened_ports: Vec::new(),
            reconcile: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn from_reconcile(report: &ReconcileReport, status: &UnitStatus) -> Self {
        let warnings = report
            .certificates
            .as_ref()
            .map(|outcome| outcome.warnings.clone())
            .unwrap_or_default();
        Self {
            reconcile: Some(ReconcileView::from_report(report)),
            warnings,
            ..Self::from_status(status)
        }
    }

    pub(crate) fn from_dispatch(report: &DispatchReport) -> Self {
        Self {
            event: Some(report.event.as_str()),
            action: Some(report.action.as_str()),
            workload_version: report.workload_version.clone(),
            opened_ports: report.opened_ports.clone(),
            reconcile: report.reconcile.as_ref().map(ReconcileView::from_report),
            warnings: report.warnings.clone(),
            ..Self::from_status(&report.status)
        }
    }

    pub(crate) fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to encode report as JSON")
    }

    pub(crate) fn to_lines(&self, style: OutputStyle) -> Vec<String> {
        let mut lines = vec![render_status_line(style, self.status, &self.message)];
        if let Some(version) = &self.workload_version {
            lines.push(format!("workload version: {version}"));
        }
        for port in &self.opened_ports {
            lines.push(format!("opened port: {port}/tcp"));
        }
        if let Some(reconcile) = &self.reconcile {
            if reconcile.skipped {
                lines.push("reconcile: skipped, no store configured".to_string());
            } else {
                if reconcile.certificates_changed {
                    lines.push("reconcile: CA bundle updated".to_string());
                }
                if !reconcile.changed_config_keys.is_empty() {
                    lines.push(format!(
                        "reconcile: updated {}",
                        reconcile.changed_config_keys.join(", ")
                    ));
                }
            }
        }
        for warning in &self.warnings {
            lines.push(render_warning_line(style, warning));
        }
        lines
    }
}

/// `<status>: <message>`, or just the status name when there is no message.
pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    let label = match style {
        OutputStyle::Plain => status.to_string(),
        OutputStyle::Rich => colorize(status_style(status), status),
    };
    if message.is_empty() {
        label
    } else {
        format!("{label}: {message}")
    }
}

fn render_warning_line(style: OutputStyle, warning: &str) -> String {
    match style {
        OutputStyle::Plain => format!("warning: {warning}"),
        OutputStyle::Rich => format!("{} {warning}", colorize(warning_style(), "[WARN]")),
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "active" => AnsiColor::BrightGreen,
        "blocked" => AnsiColor::BrightRed,
        _ => AnsiColor::BrightYellow,
    };
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn warning_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::BrightYellow.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub(crate) const LOG_ENV: &str = "PARCA_SUPERVISOR_LOG";
const FALLBACK_DIRECTIVE: &str = "info";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum LogFormat {
    Human,
    Json,
}

/// Picks the filter directive: the supervisor's own variable, then
/// `RUST_LOG`, then the configured level. Blank variables are ignored.
pub(crate) fn resolve_filter_directive(
    supervisor_log: Option<String>,
    rust_log: Option<String>,
    configured_level: &str,
) -> String {
    supervisor_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| configured_level.to_string())
}

/// Installs the global subscriber. Logs go to stderr; stdout carries the
/// command's own output.
pub(crate) fn init_logging(format: LogFormat, configured_level: &str) {
    let directive = resolve_filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        configured_level,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("warning: ignoring invalid log filter '{directive}': {err}");
        EnvFilter::new(FALLBACK_DIRECTIVE)
    });

    match format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .init();
        }
    }
}

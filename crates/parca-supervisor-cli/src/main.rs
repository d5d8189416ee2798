use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use parca_supervisor_core::AgentEvent;

mod completion;
mod config;
mod dispatch;
mod logging;
mod render;

use completion::CompletionShell;
use config::DEFAULT_CONFIG_PATH;
use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "parca-supervisor")]
#[command(
    about = "Keeps the parca-agent snap installed, configured and reporting status",
    long_about = None
)]
struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Agent(AgentCommand),
    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum AgentCommand {
    /// Handle a lifecycle or relation event.
    Event {
        #[arg(value_enum)]
        event: EventArg,
        #[arg(long)]
        json: bool,
    },
    /// Converge certificates and store config, then report status.
    Reconcile {
        #[arg(long)]
        json: bool,
    },
    /// Report status without changing anything.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print the installed agent version.
    Version,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum EventArg {
    Install,
    Upgrade,
    Start,
    Stop,
    Remove,
    UpdateStatus,
    StoreChanged,
    StoreRemoved,
    CertificatesChanged,
    ConfigChanged,
}

impl From<EventArg> for AgentEvent {
    fn from(value: EventArg) -> Self {
        match value {
            EventArg::Install => Self::Install,
            EventArg::Upgrade => Self::Upgrade,
            EventArg::Start => Self::Start,
            EventArg::Stop => Self::Stop,
            EventArg::Remove => Self::Remove,
            EventArg::UpdateStatus => Self::UpdateStatus,
            EventArg::StoreChanged => Self::StoreChanged,
            EventArg::StoreRemoved => Self::StoreRemoved,
            EventArg::CertificatesChanged => Self::CertificatesChanged,
            EventArg::ConfigChanged => Self::ConfigChanged,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch::run_cli(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(dispatch::EXIT_ERROR)
        }
    }
}

use anyhow::Result;
use std::io::{self, Write};

use parca_supervisor_core::{DesiredState, UnitStatus};
use parca_supervisor_installer::{
    detect_host_arch, HostTools, LifecycleController, ManagedPackage, SnapPackage,
    SystemHostTools,
};
use tracing::debug;

use crate::completion::write_completions_script;
use crate::config::load_config;
use crate::logging::init_logging;
use crate::render::{current_output_style, OutputStyle, ReportView};
use crate::{AgentCommand, Cli, Commands};

pub(crate) const EXIT_OK: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_BLOCKED: u8 = 2;

/// Text to print plus the status it reports, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandOutput {
    pub(crate) text: String,
    pub(crate) status: Option<UnitStatus>,
}

impl CommandOutput {
    fn report(view: &ReportView, status: UnitStatus, json: bool, style: OutputStyle) -> Result<Self> {
        let text = if json {
            view.to_json()?
        } else {
            view.to_lines(style).join("\n")
        };
        Ok(Self {
            text,
            status: Some(status),
        })
    }

    pub(crate) fn exit_code(&self) -> u8 {
        match &self.status {
            Some(status) if status.is_blocked() => EXIT_BLOCKED,
            _ => EXIT_OK,
        }
    }
}

pub(crate) fn run_cli(cli: Cli) -> Result<u8> {
    let command = match cli.command {
        Commands::Completions { shell } => {
            let mut stdout = io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
            return Ok(EXIT_OK);
        }
        Commands::Agent(command) => command,
    };

    let config = load_config(&cli.config)?;
    init_logging(cli.log_format, &config.log_level);
    debug!(config = %cli.config.display(), owner = %config.owner, "loaded config");

    let mut controller = LifecycleController::new(
        SnapPackage::new(),
        SystemHostTools::new(),
        config.layout(),
        config.owner.clone(),
        detect_host_arch(),
    );
    let output = execute(
        command,
        &mut controller,
        &config.desired_state(),
        current_output_style(),
    )?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.text)?;
    Ok(output.exit_code())
}

pub(crate) fn execute<P, H>(
    command: AgentCommand,
    controller: &mut LifecycleController<P, H>,
    desired: &DesiredState,
    style: OutputStyle,
) -> Result<CommandOutput>
where
    P: ManagedPackage,
    H: HostTools,
{
    match command {
        AgentCommand::Event { event, json } => {
            let report = controller.dispatch(event.into(), desired)?;
            let view = ReportView::from_dispatch(&report);
            CommandOutput::report(&view, report.status, json, style)
        }
        AgentCommand::Reconcile { json } => {
            let report = controller.reconcile(desired)?;
            let status = controller.status(desired)?;
            let view = ReportView::from_reconcile(&report, &status);
            CommandOutput::report(&view, status, json, style)
        }
        AgentCommand::Status { json } => {
            let status = controller.status(desired)?;
            let view = ReportView::from_status(&status);
            CommandOutput::report(&view, status, json, style)
        }
        AgentCommand::Version => Ok(CommandOutput {
            text: controller.workload_version()?,
            status: None,
        }),
    }
}

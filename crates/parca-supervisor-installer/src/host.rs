use anyhow::Result;
use std::process::Command;

use parca_supervisor_core::Arch;
use tracing::{debug, warn};

use crate::command::run_command;
use crate::snap::CommandExecutor;

/// TCP port the agent serves its metrics/scrape endpoint on.
pub const SCRAPE_PORT: u16 = 7071;

/// Host-level side effects outside the package manager.
pub trait HostTools {
    /// Rebuilds the system CA trust store from the certificate directory.
    fn refresh_trust_store(&mut self) -> Result<()>;

    fn open_port(&mut self, protocol: &str, port: u16) -> Result<()>;
}

pub struct SystemHostTools<RunCommand = CommandExecutor> {
    run_command_executor: RunCommand,
}

impl SystemHostTools {
    pub fn new() -> Self {
        Self::with_executor(run_command as CommandExecutor)
    }
}

impl Default for SystemHostTools {
    fn default() -> Self {
        Self::new()
    }
}

impl<RunCommand> SystemHostTools<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<String>,
{
    pub fn with_executor(run_command_executor: RunCommand) -> Self {
        Self {
            run_command_executor,
        }
    }
}

impl<RunCommand> HostTools for SystemHostTools<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<String>,
{
    fn refresh_trust_store(&mut self) -> Result<()> {
        let mut command = Command::new("update-ca-certificates");
        command.arg("--fresh");
        (self.run_command_executor)(&mut command, "failed to refresh CA trust store")?;
        Ok(())
    }

    fn open_port(&mut self, protocol: &str, port: u16) -> Result<()> {
        let mut command = Command::new("open-port");
        command.arg(format!("{port}/{protocol}"));
        (self.run_command_executor)(&mut command, "failed to open port")?;
        Ok(())
    }
}

/// Architecture of the machine as `uname -m` reports it, so a 32-bit or
/// emulated build still resolves the host's processor. Falls back to the
/// build target when `uname` fails.
pub fn detect_host_arch() -> Arch {
    detect_host_arch_with_executor(run_command)
}

pub fn detect_host_arch_with_executor<RunCommand>(run_command_executor: RunCommand) -> Arch
where
    RunCommand: Fn(&mut Command, &str) -> Result<String>,
{
    let mut command = Command::new("uname");
    command.arg("-m");
    match run_command_executor(&mut command, "failed to read machine architecture") {
        Ok(stdout) if !stdout.trim().is_empty() => {
            let arch = Arch::resolve(stdout.trim());
            debug!(%arch, "resolved host architecture");
            arch
        }
        Ok(_) => {
            warn!("uname -m printed nothing, using the build target architecture");
            Arch::host()
        }
        Err(err) => {
            warn!("{err:#}; using the build target architecture");
            Arch::host()
        }
    }
}

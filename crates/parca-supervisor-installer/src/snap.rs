use anyhow::Result;
use std::collections::BTreeMap;
use std::process::Command;

use parca_supervisor_core::{PackageError, Revision};
use tracing::{debug, info};

use crate::command::run_command;
use crate::{InstalledPackage, ManagedPackage, PackageState};

pub const SNAP_NAME: &str = "parca-agent";
pub const SNAP_SERVICE: &str = "parca-agent-svc";
pub const AGENT_BINARY: &str = "parca-agent";

const SNAP_PROGRAM: &str = "snap";

pub type CommandExecutor = fn(&mut Command, &str) -> Result<String>;

/// [`ManagedPackage`] backed by the `snap` command line.
pub struct SnapPackage<RunCommand = CommandExecutor> {
    name: String,
    run_command_executor: RunCommand,
}

impl SnapPackage {
    pub fn new() -> Self {
        Self::with_executor(run_command as CommandExecutor)
    }
}

impl Default for SnapPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl<RunCommand> SnapPackage<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<String>,
{
    pub fn with_executor(run_command_executor: RunCommand) -> Self {
        Self {
            name: SNAP_NAME.to_string(),
            run_command_executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, program: &str, args: &[&str], operation: &str) -> Result<String, PackageError> {
        let mut command = Command::new(program);
        command.args(args);
        (self.run_command_executor)(&mut command, &format!("{operation} {}", self.name))
            .map_err(|err| PackageError::new(operation, format!("{err:#}")))
    }

    fn snap(&self, args: &[&str]) -> Result<String, PackageError> {
        let operation = format!("snap {}", args.first().copied().unwrap_or_default());
        self.run(SNAP_PROGRAM, args, &operation)
    }

    fn listing(&self) -> Result<Option<InstalledPackage>, PackageError> {
        match self.snap(&["list", self.name.as_str()]) {
            Ok(stdout) => Ok(parse_snap_list(&stdout, &self.name)),
            Err(err) if err.message.contains("no matching snaps installed") => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl<RunCommand> ManagedPackage for SnapPackage<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<String>,
{
    fn ensure(
        &mut self,
        state: PackageState,
        revision: Option<Revision>,
        classic: bool,
    ) -> Result<(), PackageError> {
        let listing = self.listing()?;
        match state {
            PackageState::Absent => {
                if listing.is_none() {
                    debug!(snap = %self.name, "snap already absent");
                    return Ok(());
                }
                self.snap(&["remove", self.name.as_str()])?;
                info!(snap = %self.name, "removed snap");
            }
            PackageState::Present => {
                let verb = match listing {
                    None => "install",
                    Some(listing) if revision.is_some() && listing.revision == revision => {
                        debug!(snap = %self.name, ?revision, "snap already at target revision");
                        return Ok(());
                    }
                    Some(_) => "refresh",
                };
                let revision_arg = revision.map(|revision| format!("--revision={revision}"));
                let mut args = vec![verb, self.name.as_str()];
                if let Some(revision_arg) = &revision_arg {
                    args.push(revision_arg.as_str());
                }
                if classic {
                    args.push("--classic");
                }
                self.snap(&args)?;
                info!(snap = %self.name, ?revision, classic, "{verb} complete");
            }
        }
        Ok(())
    }

    fn hold(&mut self) -> Result<(), PackageError> {
        self.snap(&["refresh", "--hold", self.name.as_str()])?;
        Ok(())
    }

    fn start(&mut self, enable: bool) -> Result<(), PackageError> {
        let mut args = vec!["start"];
        if enable {
            args.push("--enable");
        }
        args.push(self.name.as_str());
        self.snap(&args)?;
        Ok(())
    }

    fn stop(&mut self, disable: bool) -> Result<(), PackageError> {
        let mut args = vec!["stop"];
        if disable {
            args.push("--disable");
        }
        args.push(self.name.as_str());
        self.snap(&args)?;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), PackageError> {
        self.snap(&["restart", self.name.as_str()])?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PackageError> {
        match self.snap(&["get", self.name.as_str(), key]) {
            Ok(stdout) => Ok(Some(stdout.trim_end_matches('\n').to_string())),
            Err(err) if is_unset_option_error(&err.message) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&mut self, values: &BTreeMap<String, String>) -> Result<(), PackageError> {
        if values.is_empty() {
            return Ok(());
        }
        let assignments = values
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>();
        let mut args = vec!["set", self.name.as_str()];
        args.extend(assignments.iter().map(String::as_str));
        // Keep assignments out of the error text, they can carry the bearer token.
        self.snap(&args).map_err(|_| {
            PackageError::new(
                "snap set",
                format!(
                    "failed to set {} on {}",
                    values.keys().cloned().collect::<Vec<_>>().join(", "),
                    self.name
                ),
            )
        })?;
        Ok(())
    }

    fn installed(&self) -> Result<Option<InstalledPackage>, PackageError> {
        self.listing()
    }

    fn service_active(&self, service: &str) -> Result<bool, PackageError> {
        let qualified = format!("{}.{service}", self.name);
        match self.snap(&["services", qualified.as_str()]) {
            Ok(stdout) => Ok(parse_snap_service_active(&stdout, &qualified)),
            Err(err)
                if err.message.contains("not found")
                    || err.message.contains("no matching snaps installed") =>
            {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn version_banner(&self) -> Result<String, PackageError> {
        self.run(AGENT_BINARY, &["--version"], "version query")
    }
}

/// Parses `snap list <name>` output:
///
/// ```text
/// Name         Version  Rev   Tracking     Publisher  Notes
/// parca-agent  v0.35.0  2587  latest/edge  parca      classic
/// ```
pub(crate) fn parse_snap_list(stdout: &str, name: &str) -> Option<InstalledPackage> {
    stdout.lines().skip(1).find_map(|line| {
        let columns = line.split_whitespace().collect::<Vec<_>>();
        if columns.first() != Some(&name) {
            return None;
        }
        Some(InstalledPackage {
            revision: columns.get(2).and_then(|rev| rev.parse().ok()),
        })
    })
}

/// Parses `snap services <snap>.<service>`; the third column is the
/// current state.
pub(crate) fn parse_snap_service_active(stdout: &str, qualified_service: &str) -> bool {
    stdout.lines().skip(1).any(|line| {
        let columns = line.split_whitespace().collect::<Vec<_>>();
        columns.first() == Some(&qualified_service) && columns.get(2) == Some(&"active")
    })
}

fn is_unset_option_error(message: &str) -> bool {
    message.contains("has no \"") && message.contains("configuration option")
}

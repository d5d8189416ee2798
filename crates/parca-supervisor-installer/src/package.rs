use std::collections::BTreeMap;

use parca_supervisor_core::{PackageError, Revision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    Present,
    Absent,
}

/// One reading of an installed package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledPackage {
    pub revision: Option<Revision>,
}

/// The package manager's view of the profiling agent package.
///
/// Mutating calls go straight to the package manager; nothing here caches
/// state between calls.
pub trait ManagedPackage {
    /// Converges the package to `state`. `Absent` removes the package but keeps
    /// its saved config and data.
    fn ensure(
        &mut self,
        state: PackageState,
        revision: Option<Revision>,
        classic: bool,
    ) -> Result<(), PackageError>;

    /// Holds the package against automatic refreshes.
    fn hold(&mut self) -> Result<(), PackageError>;

    fn start(&mut self, enable: bool) -> Result<(), PackageError>;

    fn stop(&mut self, disable: bool) -> Result<(), PackageError>;

    fn restart(&mut self) -> Result<(), PackageError>;

    /// Reads a config value. An unset key is `None`.
    fn get(&self, key: &str) -> Result<Option<String>, PackageError>;

    /// Applies every value in a single call.
    fn set(&mut self, values: &BTreeMap<String, String>) -> Result<(), PackageError>;

    /// Reads the package listing once; `None` when the package is absent.
    fn installed(&self) -> Result<Option<InstalledPackage>, PackageError>;

    fn present(&self) -> Result<bool, PackageError> {
        Ok(self.installed()?.is_some())
    }

    fn revision(&self) -> Result<Option<Revision>, PackageError> {
        Ok(self.installed()?.and_then(|package| package.revision))
    }

    fn service_active(&self, service: &str) -> Result<bool, PackageError>;

    /// Raw output of the agent binary's version flag.
    fn version_banner(&self) -> Result<String, PackageError>;
}

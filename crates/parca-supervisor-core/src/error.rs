use thiserror::Error;

use crate::{Arch, Confinement};

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("unsupported platform: no {confinement} revision of parca-agent for architecture '{arch}'")]
    UnsupportedPlatform { confinement: Confinement, arch: Arch },
    #[error(transparent)]
    PackageManager(#[from] PackageError),
    #[error("malformed version banner: {0}")]
    MalformedVersionBanner(String),
    #[error("parca agent snap not installed, cannot fetch version")]
    NotInstalled,
}

/// Failure reported by the package manager collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct PackageError {
    pub operation: String,
    pub message: String,
}

impl PackageError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

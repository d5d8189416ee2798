use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Host paths the supervisor writes to, rooted so tests can point it at a
/// scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    root: PathBuf,
}

impl HostLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ca_certificates_dir(&self) -> PathBuf {
        self.root
            .join("usr")
            .join("local")
            .join("share")
            .join("ca-certificates")
    }

    pub fn ca_bundle_path(&self, owner: &str) -> PathBuf {
        self.ca_certificates_dir()
            .join(format!("receive-ca-cert-{owner}-ca.crt"))
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("var").join("lib").join("parca-supervisor")
    }

    /// Marker for a restart the agent still owes after a committed change.
    pub fn restart_pending_path(&self, owner: &str) -> PathBuf {
        self.state_dir().join(format!("{owner}.restart-pending"))
    }
}

impl Default for HostLayout {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Owner ids end up in file names, so keep them to a safe alphabet.
pub fn validate_owner_id(owner: &str) -> Result<()> {
    if owner.is_empty() || owner.len() > 128 {
        return Err(anyhow!("invalid owner id: must be 1-128 characters"));
    }
    if let Some(ch) = owner
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')))
    {
        return Err(anyhow!(
            "invalid owner id '{owner}': unsupported character '{ch}'"
        ));
    }
    Ok(())
}

use anyhow::{Context, Result};
use std::path::Path;

use tracing::{debug, warn};

use crate::fs_utils::{read_or_empty, remove_file_if_exists, write_file_atomic};

/// A restart the agent owes after a change was committed but not yet loaded.
///
/// Ordered by strength: a stop/start also satisfies a plain restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PendingRestart {
    Restart,
    StopStart,
}

impl PendingRestart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::StopStart => "stop-start",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "restart" => Some(Self::Restart),
            "stop-start" => Some(Self::StopStart),
            _ => None,
        }
    }
}

pub(crate) fn read_pending_restart(path: &Path) -> Result<Option<PendingRestart>> {
    let raw = read_or_empty(path)
        .with_context(|| format!("failed to read restart marker: {}", path.display()))?;
    let raw = String::from_utf8_lossy(&raw);
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    Ok(Some(PendingRestart::parse(raw).unwrap_or_else(|| {
        warn!(path = %path.display(), marker = raw, "unrecognised restart marker, assuming stop-start");
        PendingRestart::StopStart
    })))
}

/// Records `restart` as owed, keeping a stronger one that is already pending.
pub(crate) fn record_pending_restart(path: &Path, restart: PendingRestart) -> Result<()> {
    let owed = read_pending_restart(path)?.map_or(restart, |current| current.max(restart));
    write_file_atomic(path, format!("{}\n", owed.as_str()).as_bytes())
        .with_context(|| format!("failed to write restart marker: {}", path.display()))?;
    debug!(path = %path.display(), pending = owed.as_str(), "recorded pending restart");
    Ok(())
}

pub(crate) fn clear_pending_restart(path: &Path) -> Result<()> {
    remove_file_if_exists(path)
        .with_context(|| format!("failed to clear restart marker: {}", path.display()))?;
    Ok(())
}

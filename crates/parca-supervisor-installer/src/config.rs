use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use parca_supervisor_core::STORE_CONFIG_KEYS;
use tracing::{debug, info};

use crate::restart::{clear_pending_restart, read_pending_restart, record_pending_restart};
use crate::{ManagedPackage, PendingRestart};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOutcome {
    pub changed_keys: Vec<String>,
    /// Set when the agent was restarted, either for this pass's changes or for
    /// a restart an earlier pass committed but could not finish.
    pub restarted: bool,
}

impl ConfigOutcome {
    pub fn changed(&self) -> bool {
        !self.changed_keys.is_empty()
    }
}

/// Applies the store keys whose desired value differs from the package config,
/// then restarts the agent. Nothing is written and nothing restarts when every
/// key already matches and no restart is owed.
///
/// The restart is recorded at `restart_marker` before the values are set and
/// cleared once it succeeds, so a failed restart is retried by the next pass
/// even though the config diff is empty by then.
///
/// Unset keys on either side compare as empty strings. Only call this with a
/// store relation in place; an absent relation is handled by the caller.
pub fn reconcile_store_config<P>(
    package: &mut P,
    desired: &BTreeMap<String, String>,
    restart_marker: &Path,
) -> Result<ConfigOutcome>
where
    P: ManagedPackage + ?Sized,
{
    let mut changeset = BTreeMap::new();
    for key in STORE_CONFIG_KEYS {
        let current = package
            .get(key)
            .with_context(|| format!("failed to read package config '{key}'"))?
            .unwrap_or_default();
        let wanted = desired.get(key).map(String::as_str).unwrap_or_default();
        if current != wanted {
            changeset.insert(key.to_string(), wanted.to_string());
        }
    }

    let changed_keys = changeset.keys().cloned().collect::<Vec<_>>();
    if changeset.is_empty() {
        debug!("store config up to date");
    } else {
        record_pending_restart(restart_marker, PendingRestart::Restart)?;
        package
            .set(&changeset)
            .context("failed to apply store config")?;
        info!(keys = ?changed_keys, "applied store config");
    }

    // A pending stop/start belongs to the certificate step and is left alone.
    if read_pending_restart(restart_marker)? != Some(PendingRestart::Restart) {
        return Ok(ConfigOutcome {
            changed_keys,
            restarted: false,
        });
    }
    package
        .restart()
        .context("failed to restart after store config change")?;
    clear_pending_restart(restart_marker)?;

    Ok(ConfigOutcome {
        changed_keys,
        restarted: true,
    })
}

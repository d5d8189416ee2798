use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use parca_supervisor_core::{DesiredState, StoreConfig};
use parca_supervisor_installer::{validate_owner_id, HostLayout};

pub(crate) const DEFAULT_CONFIG_PATH: &str = "/etc/parca-supervisor/supervisor.toml";
const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// On-disk supervisor configuration.
///
/// A missing `[store]` table means no store relation. A present table with
/// blank values is a relation whose fields are not filled in yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SupervisorConfig {
    #[serde(default = "default_config_version")]
    pub(crate) version: u32,
    pub(crate) owner: String,
    #[serde(default = "default_host_root")]
    pub(crate) host_root: PathBuf,
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,
    #[serde(default)]
    pub(crate) ca_certificates: Vec<String>,
    #[serde(default)]
    pub(crate) store: Option<StoreConfig>,
}

fn default_config_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_host_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SupervisorConfig {
    pub(crate) fn desired_state(&self) -> DesiredState {
        DesiredState {
            store: self.store.clone(),
            ca_certificates: self.ca_certificates.iter().cloned().collect(),
        }
    }

    pub(crate) fn layout(&self) -> HostLayout {
        HostLayout::new(self.host_root.clone())
    }
}

pub(crate) fn load_config(path: &Path) -> Result<SupervisorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("invalid config: {}", path.display()))
}

pub(crate) fn parse_config(raw: &str) -> Result<SupervisorConfig> {
    let config: SupervisorConfig = toml::from_str(raw).context("failed to parse TOML")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported config version {} (expected {SUPPORTED_CONFIG_VERSION})",
            config.version
        );
    }
    validate_owner_id(&config.owner)?;
    Ok(config)
}

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub const REMOTE_STORE_ADDRESS: &str = "remote-store-address";
pub const REMOTE_STORE_INSECURE: &str = "remote-store-insecure";
pub const REMOTE_STORE_BEARER_TOKEN: &str = "remote-store-bearer-token";

/// Package config keys owned by the store relation.
pub const STORE_CONFIG_KEYS: [&str; 3] = [
    REMOTE_STORE_ADDRESS,
    REMOTE_STORE_INSECURE,
    REMOTE_STORE_BEARER_TOKEN,
];

/// Connection details for the remote profile store. Blank fields are legal:
/// they mean the relation exists but the provider has not filled them in.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "remote-store-address", default)]
    pub address: String,
    #[serde(rename = "remote-store-bearer-token", default)]
    pub bearer_token: String,
    #[serde(rename = "remote-store-insecure", default)]
    pub insecure: String,
}

impl StoreConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            REMOTE_STORE_ADDRESS => Some(&self.address),
            REMOTE_STORE_BEARER_TOKEN => Some(&self.bearer_token),
            REMOTE_STORE_INSECURE => Some(&self.insecure),
            _ => None,
        }
    }

    pub fn to_values(&self) -> BTreeMap<String, String> {
        STORE_CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value.to_string())))
            .collect()
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bearer_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("StoreConfig")
            .field("address", &self.address)
            .field("bearer_token", &token)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Desired state handed to every reconcile pass.
///
/// `store` is `None` when no store relation exists at all, which is a
/// different situation from a relation whose fields are all blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub store: Option<StoreConfig>,
    pub ca_certificates: BTreeSet<String>,
}

impl DesiredState {
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }
}

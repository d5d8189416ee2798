use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::fs_utils::{read_or_empty, remove_file_if_exists, write_file_atomic};
use crate::{HostLayout, HostTools};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateOutcome {
    pub changed: bool,
    pub bundle_path: PathBuf,
    /// sha256 of the bundle now on disk, `None` when there is no bundle.
    pub fingerprint: Option<String>,
    /// Best-effort failures that did not stop the pass.
    pub warnings: Vec<String>,
}

/// Keeps one owner's CA bundle in the host certificate directory in line with
/// the trusted certificate set.
#[derive(Debug, Clone, Copy)]
pub struct CertificateReconciler<'a> {
    layout: &'a HostLayout,
    owner: &'a str,
}

impl<'a> CertificateReconciler<'a> {
    pub fn new(layout: &'a HostLayout, owner: &'a str) -> Self {
        Self { layout, owner }
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.layout.ca_bundle_path(self.owner)
    }

    /// Whether the bundle on disk already matches `certificates`.
    pub fn is_current(&self, certificates: &BTreeSet<String>) -> Result<bool> {
        let bundle_path = self.bundle_path();
        let desired = render_ca_bundle(certificates);
        if desired.is_empty() {
            return Ok(!bundle_path.exists());
        }
        Ok(read_or_empty(&bundle_path)? == desired.as_bytes())
    }

    /// Writes or removes the bundle when it differs from `certificates`.
    ///
    /// A trust store refresh follows any change. Refresh failures are logged
    /// and returned as warnings; the bundle on disk is what counts. The caller
    /// owns restarting the agent when `changed` is set.
    pub fn reconcile<H>(
        &self,
        certificates: &BTreeSet<String>,
        host: &mut H,
    ) -> Result<CertificateOutcome>
    where
        H: HostTools + ?Sized,
    {
        let bundle_path = self.bundle_path();
        let desired = render_ca_bundle(certificates);
        let current = read_or_empty(&bundle_path)?;

        let fingerprint = if desired.is_empty() {
            let removed = remove_file_if_exists(&bundle_path).with_context(|| {
                format!("failed to remove CA bundle: {}", bundle_path.display())
            })?;
            if !removed {
                debug!(path = %bundle_path.display(), "no CA bundle to remove");
                return Ok(CertificateOutcome {
                    changed: false,
                    bundle_path,
                    fingerprint: None,
                    warnings: Vec::new(),
                });
            }
            info!(path = %bundle_path.display(), "removed CA bundle");
            None
        } else {
            let fingerprint = sha256_hex(desired.as_bytes());
            if desired.as_bytes() == current.as_slice() {
                debug!(path = %bundle_path.display(), %fingerprint, "CA bundle up to date");
                return Ok(CertificateOutcome {
                    changed: false,
                    bundle_path,
                    fingerprint: Some(fingerprint),
                    warnings: Vec::new(),
                });
            }
            write_file_atomic(&bundle_path, desired.as_bytes())
                .with_context(|| format!("failed to write CA bundle: {}", bundle_path.display()))?;
            info!(
                path = %bundle_path.display(),
                certificates = certificates.len(),
                %fingerprint,
                "wrote CA bundle"
            );
            Some(fingerprint)
        };

        let mut warnings = Vec::new();
        if let Err(err) = host.refresh_trust_store() {
            let warning = format!("CA trust store refresh warning: {err:#}");
            warn!("{warning}");
            warnings.push(warning);
        }

        Ok(CertificateOutcome {
            changed: true,
            bundle_path,
            fingerprint,
            warnings,
        })
    }
}

/// Bundle content for a certificate set: sorted, each entry followed by a
/// blank line. An empty set renders as an empty string.
pub fn render_ca_bundle(certificates: &BTreeSet<String>) -> String {
    certificates
        .iter()
        .map(|certificate| format!("{certificate}\n\n"))
        .collect()
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

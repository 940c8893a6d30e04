//! Delivery platform boundary.
//!
//! The engine produces valid XML and records what the platform answered;
//! transport, retry and backoff policy belong to the delivery subsystem
//! behind [`PortalClient`]. This is the only place network latency or
//! blocking can occur.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::{DocumentId, FactureError, SubmissionReceipt};
use crate::store::MemoryStore;

/// What the delivery platform answered for one submission.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub success: bool,
    /// Platform-assigned identifier, e.g. "FR-PDP-12345".
    pub external_id: String,
    pub message: String,
}

/// Failure classification at the delivery boundary.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network or portal unavailable — eligible for caller-driven retry.
    #[error("transient: {0}")]
    Transient(String),
    /// Schema rejection or similar — requires re-serialization or manual
    /// intervention, must not be retried blindly.
    #[error("permanent: {0}")]
    Permanent(String),
}

impl From<DeliveryError> for FactureError {
    fn from(e: DeliveryError) -> Self {
        match e {
            DeliveryError::Transient(msg) => FactureError::TransientDelivery(msg),
            DeliveryError::Permanent(msg) => FactureError::PermanentDelivery(msg),
        }
    }
}

/// Outbound client for a government e-invoicing platform (French PDP/PPF,
/// Spanish FACeB2B, …). Implemented by the delivery subsystem.
pub trait PortalClient {
    fn submit(&self, xml: &[u8]) -> Result<SubmissionResult, DeliveryError>;
}

/// Where generated XML artifacts are archived.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
}

impl ArchiveConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic artifact path for a document.
    pub fn path_for(&self, id: DocumentId) -> PathBuf {
        self.root.join(format!("invoice_{id}.xml"))
    }
}

/// Write the generated XML under the archive root as `invoice_<id>.xml`.
/// Returns the written path.
pub fn archive_xml(config: &ArchiveConfig, id: DocumentId, xml: &str) -> Result<PathBuf, FactureError> {
    std::fs::create_dir_all(&config.root)?;
    let path = config.path_for(id);
    std::fs::write(&path, xml)?;
    Ok(path)
}

/// Submit a document's XML and record the platform receipt against it.
///
/// A delivery failure is returned classified and leaves the document
/// untouched; a successful submission records the external id and message.
pub fn dispatch(
    store: &MemoryStore,
    client: &dyn PortalClient,
    id: DocumentId,
    xml: &[u8],
) -> Result<SubmissionResult, FactureError> {
    store.get(id)?.ok_or(FactureError::NotFound(id))?;

    let result = match client.submit(xml) {
        Ok(result) => result,
        Err(e) => {
            warn!(id = %id, error = %e, "submission failed");
            return Err(e.into());
        }
    };

    info!(id = %id, external_id = %result.external_id, "submission accepted");
    store.record_submission(
        id,
        SubmissionReceipt {
            external_id: result.external_id.clone(),
            message: result.message.clone(),
        },
    )?;
    Ok(result)
}

/// Convenience: archive then dispatch in the order the send flow runs.
pub fn archive_and_dispatch(
    store: &MemoryStore,
    client: &dyn PortalClient,
    archive: &ArchiveConfig,
    id: DocumentId,
    xml: &str,
) -> Result<(PathBuf, SubmissionResult), FactureError> {
    let path = archive_xml(archive, id, xml)?;
    let result = dispatch(store, client, id, xml.as_bytes())?;
    Ok((path, result))
}

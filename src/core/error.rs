use thiserror::Error;

use super::types::{DocumentId, DocumentStatus};

/// Errors that can occur while building, numbering, storing or
/// serializing a billing document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactureError {
    /// Caller input fails a required invariant. Nothing was persisted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// The number allocator could not find a free candidate within its
    /// bounded search. The caller may retry or pick a different number.
    #[error("number allocation exhausted after {attempts} attempts starting from '{base}'")]
    AllocationExhausted { base: String, attempts: u32 },

    /// No serializer is registered for the document's country of supply.
    #[error("no serializer registered for country of supply '{0}'")]
    UnsupportedJurisdiction(String),

    /// The requested lifecycle transition is not permitted.
    #[error("cannot transition document from {from} to {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Document does not exist in the store.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Delivery platform reported a retryable condition (network, portal
    /// unavailable). Eligible for caller-driven retry.
    #[error("transient delivery failure: {0}")]
    TransientDelivery(String),

    /// Delivery platform rejected the payload. Requires re-serialization
    /// or manual intervention; must not be retried blindly.
    #[error("permanent delivery failure: {0}")]
    PermanentDelivery(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Filesystem error while archiving generated XML.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// A single validation finding with a field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dot-separated path to the invalid field (e.g. "seller.vat_number").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collapse a list of findings into a single [`FactureError::Validation`].
pub fn validation_error(errors: &[FieldError]) -> FactureError {
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    FactureError::Validation(msg)
}

//! Document number allocation.
//!
//! Document numbers are legally meaningful and often manually chosen: the
//! allocator preserves manual intent whenever possible while guaranteeing
//! corpus-wide uniqueness, and always picks the lowest free candidate so a
//! retried allocation is reproducible.
//!
//! The search is bounded — a corpus dense enough to exhaust it surfaces as
//! [`FactureError::AllocationExhausted`] instead of an unbounded loop.
//!
//! Atomicity of "pick candidate → persist" belongs to the caller: the
//! store runs the whole allocation under its corpus lock.

use chrono::{Datelike, NaiveDate};

use super::error::FactureError;
use super::types::DocumentType;

/// The grouping over which "next number" semantics are computed.
/// Uniqueness itself is corpus-global; only the synthesized default
/// sequence is per-scope, so invoices and credit notes never interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceScope {
    pub document_type: DocumentType,
    /// Fiscal year, taken from the document's issue date.
    pub year: i32,
}

impl SequenceScope {
    pub fn new(document_type: DocumentType, issue_date: NaiveDate) -> Self {
        Self {
            document_type,
            year: issue_date.year(),
        }
    }
}

/// Allocator tuning.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorConfig {
    /// First sequence number synthesized into a default, e.g. 1001 for
    /// `INV-2024-1001`.
    pub base_offset: u32,
    /// Upper bound on collision-resolution attempts per allocation.
    pub max_attempts: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            base_offset: 1001,
            max_attempts: 10_000,
        }
    }
}

/// View of the existing number corpus the allocator searches against.
/// Implemented by the document store.
pub trait NumberIndex {
    /// Whether `number` is already reserved anywhere in the corpus.
    fn is_taken(&self, number: &str) -> bool;
    /// How many documents exist in `scope` (drives the default sequence).
    fn count_in_scope(&self, scope: SequenceScope) -> usize;
}

/// Index wrapper that ignores one reserved number — used when editing a
/// document so its own current number is not treated as a collision.
pub struct Excluding<'a, I: NumberIndex + ?Sized> {
    pub index: &'a I,
    pub number: &'a str,
}

impl<I: NumberIndex + ?Sized> NumberIndex for Excluding<'_, I> {
    fn is_taken(&self, number: &str) -> bool {
        number != self.number && self.index.is_taken(number)
    }

    fn count_in_scope(&self, scope: SequenceScope) -> usize {
        self.index.count_in_scope(scope)
    }
}

/// Allocate a unique document number.
///
/// An empty or absent request synthesizes
/// `<PREFIX>-<year>-<base_offset + count_in_scope>`. A free requested
/// number is accepted verbatim. On collision, a number shaped
/// `<prefix>-<year>-<digits>` is incremented to the lowest free candidate
/// in the same family; any other shape falls back to `-COPY-<n>`
/// suffixing.
pub fn allocate(
    requested: Option<&str>,
    scope: SequenceScope,
    config: &AllocatorConfig,
    index: &dyn NumberIndex,
) -> Result<String, FactureError> {
    let trimmed = requested.unwrap_or("").trim();
    let base = if trimmed.is_empty() {
        let seq = u64::from(config.base_offset) + index.count_in_scope(scope) as u64;
        format!(
            "{}-{}-{}",
            scope.document_type.number_prefix(),
            scope.year,
            seq
        )
    } else {
        trimmed.to_string()
    };

    if !index.is_taken(&base) {
        return Ok(base);
    }

    if let Some((prefix, year, start)) = parse_structured(&base) {
        for attempt in 1..=u64::from(config.max_attempts) {
            let candidate = format!("{prefix}-{year}-{}", start + attempt);
            if !index.is_taken(&candidate) {
                return Ok(candidate);
            }
        }
        return Err(FactureError::AllocationExhausted {
            base,
            attempts: config.max_attempts,
        });
    }

    for attempt in 1..=u64::from(config.max_attempts) {
        let candidate = format!("{base}-COPY-{attempt}");
        if !index.is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(FactureError::AllocationExhausted {
        base,
        attempts: config.max_attempts,
    })
}

/// Allocate while excluding one document's own number from collision
/// checks — the edit path.
pub fn allocate_excluding(
    requested: Option<&str>,
    current_number: &str,
    scope: SequenceScope,
    config: &AllocatorConfig,
    index: &dyn NumberIndex,
) -> Result<String, FactureError> {
    let excluding = Excluding {
        index,
        number: current_number,
    };
    allocate(requested, scope, config, &excluding)
}

/// Split `<prefix>-<year>-<digits>`. The prefix may itself contain
/// dashes; the year must be exactly four digits and the tail all digits.
fn parse_structured(number: &str) -> Option<(&str, &str, u64)> {
    let mut parts = number.rsplitn(3, '-');
    let digits = parts.next()?;
    let year = parts.next()?;
    let prefix = parts.next()?;
    if prefix.is_empty()
        || year.len() != 4
        || !year.bytes().all(|b| b.is_ascii_digit())
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let start: u64 = digits.parse().ok()?;
    Some((prefix, year, start))
}

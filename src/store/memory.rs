use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Datelike;
use tracing::debug;

use crate::core::numbering::{self, AllocatorConfig, NumberIndex, SequenceScope};
use crate::core::{
    Document, DocumentId, DocumentStatus, DocumentType, FactureError, NewDocument,
    SubmissionReceipt, compute_totals,
};

#[derive(Default)]
struct Corpus {
    documents: HashMap<DocumentId, Document>,
    /// number → owning document. The uniqueness constraint.
    numbers: HashMap<String, DocumentId>,
}

impl NumberIndex for Corpus {
    fn is_taken(&self, number: &str) -> bool {
        self.numbers.contains_key(number)
    }

    fn count_in_scope(&self, scope: SequenceScope) -> usize {
        self.documents
            .values()
            .filter(|d| {
                d.document_type == scope.document_type && d.issue_date.year() == scope.year
            })
            .count()
    }
}

/// In-memory document store.
///
/// A single mutex guards the corpus, so every operation — in particular
/// the "compute candidate → persist" allocation step — is one atomic unit
/// with respect to concurrent writers.
#[derive(Default)]
pub struct MemoryStore {
    corpus: Mutex<Corpus>,
    config: AllocatorConfig,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        Self {
            corpus: Mutex::new(Corpus::default()),
            config,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Corpus>, FactureError> {
        self.corpus.lock().map_err(|_| FactureError::LockPoisoned)
    }

    /// Persist a new document: verify credit-note linkage, allocate the
    /// number, and insert header+lines as one value. Nothing is written
    /// if any step fails.
    pub fn create(&self, new: NewDocument) -> Result<Document, FactureError> {
        check_intent(&new)?;
        let mut corpus = self.lock()?;

        check_credit_link(&corpus, &new)?;

        let scope = SequenceScope::new(new.document_type, new.issue_date);
        let number = numbering::allocate(
            new.requested_number.as_deref(),
            scope,
            &self.config,
            &*corpus,
        )?;

        // Totals are an invariant of the lines — recompute regardless of
        // what the builder carried.
        let totals = compute_totals(&new.lines);

        let doc = Document {
            id: DocumentId::new(),
            document_type: new.document_type,
            number: number.clone(),
            issue_date: new.issue_date,
            due_date: new.due_date,
            tax_point_date: new.tax_point_date,
            status: new.intent,
            transaction_category: new.transaction_category,
            payment_means: new.payment_means,
            country_of_supply: new.country_of_supply,
            currency: new.currency,
            seller: new.seller,
            buyer: new.buyer,
            buyer_reference: new.buyer_reference,
            order_reference: new.order_reference,
            notes: new.notes,
            terms: new.terms,
            original_document_id: new.original_document_id,
            lines: new.lines,
            totals,
            submission: None,
        };

        debug!(number = %doc.number, id = %doc.id, "document created");
        corpus.numbers.insert(number, doc.id);
        corpus.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    /// Replace a draft document's header and lines wholesale, in one
    /// atomic unit. Reallocation excludes the document's own number; a
    /// non-draft document cannot be edited (its number is immutable).
    pub fn update(&self, id: DocumentId, new: NewDocument) -> Result<Document, FactureError> {
        check_intent(&new)?;
        let mut corpus = self.lock()?;

        let existing = corpus
            .documents
            .get(&id)
            .ok_or(FactureError::NotFound(id))?;
        if existing.status != DocumentStatus::Draft {
            return Err(FactureError::Validation(format!(
                "only draft documents may be edited (status is {})",
                existing.status
            )));
        }
        let old_number = existing.number.clone();

        check_credit_link(&corpus, &new)?;

        let scope = SequenceScope::new(new.document_type, new.issue_date);
        let number = numbering::allocate_excluding(
            new.requested_number.as_deref(),
            &old_number,
            scope,
            &self.config,
            &*corpus,
        )?;

        let totals = compute_totals(&new.lines);

        let doc = Document {
            id,
            document_type: new.document_type,
            number: number.clone(),
            issue_date: new.issue_date,
            due_date: new.due_date,
            tax_point_date: new.tax_point_date,
            status: new.intent,
            transaction_category: new.transaction_category,
            payment_means: new.payment_means,
            country_of_supply: new.country_of_supply,
            currency: new.currency,
            seller: new.seller,
            buyer: new.buyer,
            buyer_reference: new.buyer_reference,
            order_reference: new.order_reference,
            notes: new.notes,
            terms: new.terms,
            original_document_id: new.original_document_id,
            lines: new.lines,
            totals,
            submission: None,
        };

        debug!(number = %doc.number, id = %doc.id, "document updated");
        corpus.numbers.remove(&old_number);
        corpus.numbers.insert(number, id);
        corpus.documents.insert(id, doc.clone());
        Ok(doc)
    }

    /// Delete a draft document (header + lines). Any other status is
    /// rejected without side effects.
    pub fn delete(&self, id: DocumentId) -> Result<(), FactureError> {
        let mut corpus = self.lock()?;

        let doc = corpus
            .documents
            .get(&id)
            .ok_or(FactureError::NotFound(id))?;
        if doc.status != DocumentStatus::Draft {
            return Err(FactureError::Validation(format!(
                "only draft documents may be deleted (status is {})",
                doc.status
            )));
        }

        let number = doc.number.clone();
        corpus.numbers.remove(&number);
        corpus.documents.remove(&id);
        debug!(number = %number, id = %id, "draft deleted");
        Ok(())
    }

    /// Apply a lifecycle transition.
    pub fn transition(
        &self,
        id: DocumentId,
        to: DocumentStatus,
    ) -> Result<Document, FactureError> {
        let mut corpus = self.lock()?;

        let doc = corpus
            .documents
            .get_mut(&id)
            .ok_or(FactureError::NotFound(id))?;
        if !doc.status.can_transition_to(to) {
            return Err(FactureError::InvalidTransition {
                from: doc.status,
                to,
            });
        }
        doc.status = to;
        debug!(number = %doc.number, status = %to, "status changed");
        Ok(doc.clone())
    }

    /// Record the delivery platform's receipt against the document.
    pub fn record_submission(
        &self,
        id: DocumentId,
        receipt: SubmissionReceipt,
    ) -> Result<(), FactureError> {
        let mut corpus = self.lock()?;
        let doc = corpus
            .documents
            .get_mut(&id)
            .ok_or(FactureError::NotFound(id))?;
        doc.submission = Some(receipt);
        Ok(())
    }

    pub fn get(&self, id: DocumentId) -> Result<Option<Document>, FactureError> {
        Ok(self.lock()?.documents.get(&id).cloned())
    }

    /// All documents, ordered by number for deterministic listings.
    pub fn list(&self) -> Result<Vec<Document>, FactureError> {
        let corpus = self.lock()?;
        let mut docs: Vec<Document> = corpus.documents.values().cloned().collect();
        docs.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(docs)
    }
}

/// A document is created (or saved on edit) as draft or sent — never
/// directly in a terminal state.
fn check_intent(new: &NewDocument) -> Result<(), FactureError> {
    match new.intent {
        DocumentStatus::Draft | DocumentStatus::Sent => Ok(()),
        other => Err(FactureError::Validation(format!(
            "creation intent must be DRAFT or SENT, got {other}"
        ))),
    }
}

/// A credit note's `original_document_id` must reference an existing
/// invoice. The referenced invoice is never mutated — issuing a credit
/// note has no ledger effect here.
fn check_credit_link(corpus: &Corpus, new: &NewDocument) -> Result<(), FactureError> {
    if let Some(orig_id) = new.original_document_id {
        let orig = corpus
            .documents
            .get(&orig_id)
            .ok_or_else(|| {
                FactureError::Validation(format!(
                    "original_document_id: no document with id {orig_id}"
                ))
            })?;
        if orig.document_type != DocumentType::Invoice {
            return Err(FactureError::Validation(
                "original_document_id: a credit note must reference an invoice".into(),
            ));
        }
    }
    Ok(())
}

use chrono::NaiveDate;
use facture::core::*;
use facture::store::MemoryStore;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller() -> Party {
    PartyBuilder::new("ACME")
        .vat_number("FR32123456789")
        .siret("12345678900017")
        .address(AddressBuilder::new("Paris", "75001", "FR").build())
        .build()
}

fn buyer() -> Party {
    PartyBuilder::new("Client SARL").build()
}

fn draft_invoice() -> NewDocument {
    DocumentBuilder::new(DocumentType::Invoice, date(2024, 6, 15))
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Conseil", dec!(2), dec!(500)).build())
        .add_line(LineBuilder::new("Formation", dec!(1), dec!(800)).build())
        .build()
        .unwrap()
}

// --- Create ---

#[test]
fn create_persists_header_and_lines_together() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();

    let fetched = store.get(doc.id).unwrap().unwrap();
    assert_eq!(fetched.lines.len(), 2);
    assert_eq!(fetched.number, doc.number);
    assert_eq!(fetched.status, DocumentStatus::Draft);
    assert_eq!(fetched.totals.gross, dec!(2160.00));
}

#[test]
fn finalized_intent_creates_sent_document() {
    let store = MemoryStore::new();
    let new_doc = DocumentBuilder::new(DocumentType::Invoice, date(2024, 6, 15))
        .finalized()
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Conseil", dec!(1), dec!(100)).build())
        .build()
        .unwrap();

    let doc = store.create(new_doc).unwrap();
    assert_eq!(doc.status, DocumentStatus::Sent);
}

#[test]
fn failed_validation_persists_nothing() {
    let store = MemoryStore::new();
    // Credit note referencing a nonexistent invoice.
    let new_doc = DocumentBuilder::new(DocumentType::CreditNote, date(2024, 6, 15))
        .credits_invoice(DocumentId::new())
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Avoir", dec!(1), dec!(100)).build())
        .build()
        .unwrap();

    assert!(store.create(new_doc).is_err());
    assert!(store.list().unwrap().is_empty());
}

// --- Lifecycle ---

#[test]
fn draft_can_be_deleted() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    store.delete(doc.id).unwrap();
    assert!(store.get(doc.id).unwrap().is_none());
}

#[test]
fn deleting_a_draft_frees_its_number() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    assert_eq!(doc.number, "INV-2024-1001");
    store.delete(doc.id).unwrap();

    let next = store.create(draft_invoice()).unwrap();
    assert_eq!(next.number, "INV-2024-1001");
}

#[test]
fn sent_document_cannot_be_deleted() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    store.transition(doc.id, DocumentStatus::Sent).unwrap();

    let err = store.delete(doc.id).unwrap_err();
    assert!(matches!(err, FactureError::Validation(_)));
    // Rejected without side effects.
    assert!(store.get(doc.id).unwrap().is_some());
}

#[test]
fn paid_document_cannot_be_deleted() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    store.transition(doc.id, DocumentStatus::Sent).unwrap();
    store.transition(doc.id, DocumentStatus::Paid).unwrap();

    assert!(store.delete(doc.id).is_err());
    assert!(store.get(doc.id).unwrap().is_some());
}

#[test]
fn lifecycle_transitions_follow_state_machine() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();

    store.transition(doc.id, DocumentStatus::Sent).unwrap();
    let err = store.transition(doc.id, DocumentStatus::Draft).unwrap_err();
    assert!(matches!(err, FactureError::InvalidTransition { .. }));

    store.transition(doc.id, DocumentStatus::Paid).unwrap();
    let err = store
        .transition(doc.id, DocumentStatus::Cancelled)
        .unwrap_err();
    assert!(matches!(err, FactureError::InvalidTransition { .. }));
}

#[test]
fn cancelled_is_terminal() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    store.transition(doc.id, DocumentStatus::Cancelled).unwrap();
    assert!(store.transition(doc.id, DocumentStatus::Sent).is_err());
}

// --- Update ---

#[test]
fn update_replaces_lines_wholesale() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();

    let edited = DocumentBuilder::new(DocumentType::Invoice, date(2024, 6, 15))
        .requested_number(&doc.number)
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Audit", dec!(3), dec!(400)).vat_rate(dec!(10)).build())
        .build()
        .unwrap();

    let updated = store.update(doc.id, edited).unwrap();
    assert_eq!(updated.lines.len(), 1);
    assert_eq!(updated.lines[0].description, "Audit");
    assert_eq!(updated.totals.net, dec!(1200.00));
    assert_eq!(updated.totals.tax, dec!(120.00));

    let fetched = store.get(doc.id).unwrap().unwrap();
    assert_eq!(fetched.lines.len(), 1);
}

#[test]
fn update_keeps_own_number_without_collision() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();

    let edited = DocumentBuilder::new(DocumentType::Invoice, date(2024, 6, 15))
        .requested_number(&doc.number)
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Conseil", dec!(1), dec!(100)).build())
        .build()
        .unwrap();

    let updated = store.update(doc.id, edited).unwrap();
    assert_eq!(updated.number, doc.number);
}

#[test]
fn update_resolves_collision_with_other_documents() {
    let store = MemoryStore::new();
    let first = store.create(draft_invoice()).unwrap(); // INV-2024-1001
    let second = store.create(draft_invoice()).unwrap(); // INV-2024-1002

    let edited = DocumentBuilder::new(DocumentType::Invoice, date(2024, 6, 15))
        .requested_number(&first.number)
        .seller(seller())
        .buyer(buyer())
        .add_line(LineBuilder::new("Conseil", dec!(1), dec!(100)).build())
        .build()
        .unwrap();

    let updated = store.update(second.id, edited).unwrap();
    assert_ne!(updated.number, first.number);
    // Lowest free candidate in the family is the document's own number,
    // which is excluded from the collision check.
    assert_eq!(updated.number, "INV-2024-1002");
}

#[test]
fn non_draft_document_cannot_be_edited() {
    let store = MemoryStore::new();
    let doc = store.create(draft_invoice()).unwrap();
    store.transition(doc.id, DocumentStatus::Sent).unwrap();

    let err = store.update(doc.id, draft_invoice()).unwrap_err();
    assert!(matches!(err, FactureError::Validation(_)));
    // Number is immutable once the document left draft.
    assert_eq!(store.get(doc.id).unwrap().unwrap().number, doc.number);
}

#[test]
fn update_of_unknown_document_is_not_found() {
    let store = MemoryStore::new();
    let err = store.update(DocumentId::new(), draft_invoice()).unwrap_err();
    assert!(matches!(err, FactureError::NotFound(_)));
}

// --- Credit notes ---

#[test]
fn credit_note_links_to_existing_invoice() {
    let store = MemoryStore::new();
    let invoice = store.create(draft_invoice()).unwrap();

    let cn = store
        .create(
            DocumentBuilder::new(DocumentType::CreditNote, date(2024, 7, 1))
                .credits_invoice(invoice.id)
                .seller(seller())
                .buyer(buyer())
                .add_line(LineBuilder::new("Avoir sur conseil", dec!(1), dec!(500)).build())
                .build()
                .unwrap(),
        )
        .unwrap();

    assert_eq!(cn.original_document_id, Some(invoice.id));
    assert_eq!(cn.number, "CN-2024-1001");
}

#[test]
fn credit_note_cannot_reference_a_credit_note() {
    let store = MemoryStore::new();
    let invoice = store.create(draft_invoice()).unwrap();
    let cn = store
        .create(
            DocumentBuilder::new(DocumentType::CreditNote, date(2024, 7, 1))
                .credits_invoice(invoice.id)
                .seller(seller())
                .buyer(buyer())
                .add_line(LineBuilder::new("Avoir", dec!(1), dec!(100)).build())
                .build()
                .unwrap(),
        )
        .unwrap();

    let err = store
        .create(
            DocumentBuilder::new(DocumentType::CreditNote, date(2024, 7, 2))
                .credits_invoice(cn.id)
                .seller(seller())
                .buyer(buyer())
                .add_line(LineBuilder::new("Avoir d'avoir", dec!(1), dec!(50)).build())
                .build()
                .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, FactureError::Validation(_)));
}

#[test]
fn issuing_a_credit_note_does_not_touch_the_invoice() {
    let store = MemoryStore::new();
    let invoice = store.create(draft_invoice()).unwrap();
    store.transition(invoice.id, DocumentStatus::Sent).unwrap();
    let before = store.get(invoice.id).unwrap().unwrap();

    store
        .create(
            DocumentBuilder::new(DocumentType::CreditNote, date(2024, 7, 1))
                .credits_invoice(invoice.id)
                .seller(seller())
                .buyer(buyer())
                .add_line(LineBuilder::new("Avoir", dec!(1), dec!(2160)).build())
                .build()
                .unwrap(),
        )
        .unwrap();

    let after = store.get(invoice.id).unwrap().unwrap();
    assert_eq!(after.status, before.status);
    assert_eq!(after.totals, before.totals);
}

// --- Listing ---

#[test]
fn list_is_ordered_by_number() {
    let store = MemoryStore::new();
    for _ in 0..3 {
        store.create(draft_invoice()).unwrap();
    }
    let numbers: Vec<String> = store.list().unwrap().into_iter().map(|d| d.number).collect();
    assert_eq!(
        numbers,
        vec!["INV-2024-1001", "INV-2024-1002", "INV-2024-1003"]
    );
}

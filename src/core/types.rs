use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque document identifier. Also keys the archived XML artifact
/// (`invoice_<id>.xml`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A billing document — invoice or credit note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// BT-3: UNTDID 1001 document type.
    pub document_type: DocumentType,
    /// BT-1: Document number. Unique across the whole corpus regardless of
    /// type; immutable once the document has left [`DocumentStatus::Draft`].
    pub number: String,
    /// BT-2: Issue date.
    pub issue_date: NaiveDate,
    /// BT-9: Payment due date.
    pub due_date: Option<NaiveDate>,
    /// BT-8: Tax point date (date of supply). Serialization falls back to
    /// `issue_date` when absent.
    pub tax_point_date: Option<NaiveDate>,
    pub status: DocumentStatus,
    pub transaction_category: TransactionCategory,
    /// BT-81: How the buyer is expected to pay.
    pub payment_means: PaymentMeans,
    /// Country whose e-invoicing standard applies (ISO 3166-1 alpha-2).
    /// Selects the jurisdiction serializer.
    pub country_of_supply: String,
    /// BT-5: ISO 4217 currency code.
    pub currency: String,
    /// BG-4: The issuing company.
    pub seller: Party,
    /// BG-7: The customer.
    pub buyer: Party,
    /// BT-10: Buyer reference for electronic routing/matching.
    pub buyer_reference: Option<String>,
    /// BT-13: Purchase order reference.
    pub order_reference: Option<String>,
    /// BT-22: Free-text note to the customer.
    pub notes: Option<String>,
    /// BT-20: Payment terms free text.
    pub terms: Option<String>,
    /// For credit notes: the invoice this document offsets. Must reference
    /// a document of type [`DocumentType::Invoice`].
    pub original_document_id: Option<DocumentId>,
    /// BG-25: Lines. Replaced wholesale on edit, never merged.
    pub lines: Vec<DocumentLine>,
    /// BG-22: Header totals, always recomputed server-side from `lines`.
    pub totals: Totals,
    /// Receipt from the delivery platform, recorded after dispatch.
    pub submission: Option<SubmissionReceipt>,
}

/// UNTDID 1001 — document type codes in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 380 — Commercial invoice.
    Invoice,
    /// 381 — Credit note.
    CreditNote,
}

impl DocumentType {
    /// UNTDID 1001 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
        }
    }

    /// Prefix used when synthesizing a default document number.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::CreditNote => "CN",
        }
    }

    /// Parse from UNTDID 1001 numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            380 => Some(Self::Invoice),
            381 => Some(Self::CreditNote),
            _ => None,
        }
    }
}

/// Document lifecycle state.
///
/// Draft → {Sent, Cancelled}; Sent → {Paid, Cancelled};
/// Paid and Cancelled are terminal. A document is created directly in
/// Draft or Sent depending on caller intent — there is no separate
/// finalize transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Draft,
    Sent,
    Paid,
    Cancelled,
}

impl DocumentStatus {
    /// Whether the state machine permits moving from `self` to `to`.
    pub fn can_transition_to(&self, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, to),
            (Draft, Sent) | (Draft, Cancelled) | (Sent, Paid) | (Sent, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Closed set of supported e-invoicing standards. Adding a country is an
/// additive variant here plus a generator, never a conditional scattered
/// across call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// France — Factur-X / UN/CEFACT Cross Industry Invoice.
    FranceCii,
    /// Spain — FacturaE 3.2.1.
    SpainFacturae,
}

impl Jurisdiction {
    /// Resolve the serializer for a document's country of supply.
    pub fn resolve(country_of_supply: &str) -> Result<Self, crate::core::error::FactureError> {
        match country_of_supply {
            "FR" => Ok(Self::FranceCii),
            "ES" => Ok(Self::SpainFacturae),
            other => Err(crate::core::error::FactureError::UnsupportedJurisdiction(
                other.to_string(),
            )),
        }
    }
}

/// Tax treatment of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCategory {
    Domestic,
    IntraEu,
    Export,
}

/// UNTDID 4461 — payment means in scope for French invoicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMeans {
    /// 30 — Credit transfer.
    Transfer,
    /// 58 — SEPA direct debit.
    DirectDebit,
    /// 48 — Bank card.
    Card,
    /// 10 — Cash.
    Cash,
    /// 20 — Cheque.
    Cheque,
}

impl PaymentMeans {
    /// UNTDID 4461 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Transfer => 30,
            Self::DirectDebit => 58,
            Self::Card => 48,
            Self::Cash => 10,
            Self::Cheque => 20,
        }
    }

    /// Parse a stored label. Unknown values map to `Transfer` (code 30).
    pub fn parse(label: &str) -> Self {
        match label {
            "DIRECT_DEBIT" => Self::DirectDebit,
            "CARD" => Self::Card,
            "CASH" => Self::Cash,
            "CHEQUE" => Self::Cheque,
            _ => Self::Transfer,
        }
    }
}

impl Default for PaymentMeans {
    fn default() -> Self {
        Self::Transfer
    }
}

/// BG-4 / BG-7: A legal party — the issuing company or the customer.
///
/// Every field a serializer may need is a first-class optional value;
/// jurisdiction validation decides what is mandatory, never the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Party {
    /// BT-27 / BT-44: Trading name.
    pub name: String,
    /// Registered legal name (raison sociale) when it differs from `name`.
    pub legal_name: Option<String>,
    /// Legal form, e.g. "SAS", "SARL", "EURL".
    pub legal_form: Option<String>,
    /// Share capital as displayed on legal mentions, e.g. "10 000 €".
    pub share_capital: Option<String>,
    /// City of the trade register (RCS) the company is registered with.
    pub rcs_city: Option<String>,
    /// BT-31 / BT-48: VAT identifier, e.g. "FR32123456789".
    pub vat_number: Option<String>,
    /// French business registration number (9 digits).
    pub siren: Option<String>,
    /// French establishment registration number (14 digits).
    pub siret: Option<String>,
    /// BG-5 / BG-8: Postal address. FR serialization requires a resolved
    /// address for the seller.
    pub address: Option<Address>,
    /// Routing identifier on the e-invoicing network (PDP/PPF).
    pub delivery_channel: Option<ElectronicChannel>,
    /// Invoice contact email.
    pub email: Option<String>,
    /// Invoice contact phone.
    pub phone: Option<String>,
}

impl Party {
    /// Best available display name for legal mentions.
    pub fn legal_or_trade_name(&self) -> &str {
        self.legal_name.as_deref().unwrap_or(&self.name)
    }
}

/// BG-5 / BG-8: Postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// BT-35 / BT-50: Street + number.
    pub street: Option<String>,
    /// BT-37 / BT-52: City.
    pub city: String,
    /// BT-38 / BT-53: Postal code.
    pub postal_code: String,
    /// BT-40 / BT-55: Country code (ISO 3166-1 alpha-2).
    pub country_code: String,
}

/// Electronic delivery channel for e-invoice routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectronicChannel {
    /// Channel kind, e.g. "PDP" or "PPF".
    pub scheme: String,
    /// Platform-assigned routing identifier.
    pub id: String,
}

/// BG-25: A document line. Derived amounts are computed by
/// [`crate::core::totals::compute_line`] and rounded to 2 decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLine {
    /// BT-153: What is being billed.
    pub description: String,
    /// BT-157: Product/service code, emitted as a scheme-qualified
    /// global id when present.
    pub product_code: Option<String>,
    /// BT-130: UN/CEFACT Rec 20 unit code; serializers default to "C62".
    pub unit_code: Option<String>,
    /// BT-129: Invoiced quantity.
    pub quantity: Decimal,
    /// BT-146: Net unit price.
    pub unit_price: Decimal,
    /// BT-152: VAT rate percentage.
    pub vat_rate: Decimal,
    /// Derived: quantity × unit_price.
    pub net: Decimal,
    /// Derived: net × vat_rate / 100.
    pub vat_amount: Decimal,
    /// Derived: net + vat_amount.
    pub line_total: Decimal,
}

/// BG-22: Header totals. Invariant: `gross == net + tax`, and each field
/// equals the sum of the corresponding per-line amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
}

/// Result of handing the XML to the delivery platform, as recorded
/// against the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub external_id: String,
    pub message: String,
}

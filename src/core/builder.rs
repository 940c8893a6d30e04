use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{FactureError, validation_error};
use super::totals::{compute_line, compute_totals};
use super::types::*;
use super::validation;

/// A validated, fully computed document awaiting persistence. The store
/// assigns the id and the final number.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub document_type: DocumentType,
    /// Manually chosen number, passed through the allocator's
    /// check-and-reserve. Empty/absent → a default is synthesized.
    pub requested_number: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub tax_point_date: Option<NaiveDate>,
    /// Creation intent: save as draft or finalize immediately.
    pub intent: DocumentStatus,
    pub transaction_category: TransactionCategory,
    pub payment_means: PaymentMeans,
    pub country_of_supply: String,
    pub currency: String,
    pub seller: Party,
    pub buyer: Party,
    pub buyer_reference: Option<String>,
    pub order_reference: Option<String>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub original_document_id: Option<DocumentId>,
    pub lines: Vec<DocumentLine>,
    pub totals: Totals,
}

/// Builder for billing documents.
///
/// ```
/// use facture::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let new_doc = DocumentBuilder::new(DocumentType::Invoice, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .seller(PartyBuilder::new("ACME")
///         .vat_number("FR32123456789")
///         .address(AddressBuilder::new("Paris", "75001", "FR").build())
///         .build())
///     .buyer(PartyBuilder::new("Client SARL").build())
///     .add_line(LineBuilder::new("Conseil", dec!(2), dec!(500)).vat_rate(dec!(20)).build())
///     .build()
///     .unwrap();
/// assert_eq!(new_doc.totals.gross, dec!(1200.00));
/// ```
pub struct DocumentBuilder {
    document_type: DocumentType,
    requested_number: Option<String>,
    issue_date: NaiveDate,
    due_date: Option<NaiveDate>,
    tax_point_date: Option<NaiveDate>,
    intent: DocumentStatus,
    transaction_category: TransactionCategory,
    payment_means: PaymentMeans,
    country_of_supply: String,
    currency: String,
    seller: Option<Party>,
    buyer: Option<Party>,
    buyer_reference: Option<String>,
    order_reference: Option<String>,
    notes: Option<String>,
    terms: Option<String>,
    original_document_id: Option<DocumentId>,
    lines: Vec<DocumentLine>,
}

impl DocumentBuilder {
    pub fn new(document_type: DocumentType, issue_date: NaiveDate) -> Self {
        Self {
            document_type,
            requested_number: None,
            issue_date,
            due_date: None,
            tax_point_date: None,
            intent: DocumentStatus::Draft,
            transaction_category: TransactionCategory::Domestic,
            payment_means: PaymentMeans::default(),
            country_of_supply: "FR".to_string(),
            currency: "EUR".to_string(),
            seller: None,
            buyer: None,
            buyer_reference: None,
            order_reference: None,
            notes: None,
            terms: None,
            original_document_id: None,
            lines: Vec::new(),
        }
    }

    pub fn requested_number(mut self, number: impl Into<String>) -> Self {
        self.requested_number = Some(number.into());
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn tax_point_date(mut self, date: NaiveDate) -> Self {
        self.tax_point_date = Some(date);
        self
    }

    /// Create the document directly in `Sent` instead of `Draft`.
    pub fn finalized(mut self) -> Self {
        self.intent = DocumentStatus::Sent;
        self
    }

    pub fn transaction_category(mut self, category: TransactionCategory) -> Self {
        self.transaction_category = category;
        self
    }

    pub fn payment_means(mut self, means: PaymentMeans) -> Self {
        self.payment_means = means;
        self
    }

    pub fn country_of_supply(mut self, code: impl Into<String>) -> Self {
        self.country_of_supply = code.into();
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(party);
        self
    }

    pub fn buyer_reference(mut self, reference: impl Into<String>) -> Self {
        self.buyer_reference = Some(reference.into());
        self
    }

    pub fn order_reference(mut self, reference: impl Into<String>) -> Self {
        self.order_reference = Some(reference.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }

    /// Link a credit note to the invoice it offsets. The store verifies
    /// the reference points at an existing invoice.
    pub fn credits_invoice(mut self, id: DocumentId) -> Self {
        self.original_document_id = Some(id);
        self
    }

    pub fn add_line(mut self, line: DocumentLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Validate and compute totals. Returns every finding, not just the
    /// first.
    pub fn build(self) -> Result<NewDocument, FactureError> {
        let seller = self
            .seller
            .ok_or_else(|| FactureError::Builder("seller is required".into()))?;
        let buyer = self
            .buyer
            .ok_or_else(|| FactureError::Builder("buyer is required".into()))?;

        // Input limits to prevent abuse
        if self.lines.len() > 10_000 {
            return Err(FactureError::Builder(
                "document cannot have more than 10,000 lines".into(),
            ));
        }
        if let Some(n) = &self.requested_number {
            if n.len() > 200 {
                return Err(FactureError::Builder(
                    "document number cannot exceed 200 characters".into(),
                ));
            }
        }
        if self.original_document_id.is_some() && self.document_type != DocumentType::CreditNote {
            return Err(FactureError::Builder(
                "only a credit note may reference an original document".into(),
            ));
        }

        let errors = validation::validate_document_input(
            &self.currency,
            &self.country_of_supply,
            &seller,
            &buyer,
            &self.lines,
        );
        if !errors.is_empty() {
            return Err(validation_error(&errors));
        }

        let totals = compute_totals(&self.lines);

        Ok(NewDocument {
            document_type: self.document_type,
            requested_number: self.requested_number,
            issue_date: self.issue_date,
            due_date: self.due_date,
            tax_point_date: self.tax_point_date,
            intent: self.intent,
            transaction_category: self.transaction_category,
            payment_means: self.payment_means,
            country_of_supply: self.country_of_supply,
            currency: self.currency,
            seller,
            buyer,
            buyer_reference: self.buyer_reference,
            order_reference: self.order_reference,
            notes: self.notes,
            terms: self.terms,
            original_document_id: self.original_document_id,
            lines: self.lines,
            totals,
        })
    }
}

/// Builder for Party (seller/buyer).
#[derive(Default)]
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            party: Party {
                name: name.into(),
                ..Party::default()
            },
        }
    }

    pub fn legal_name(mut self, name: impl Into<String>) -> Self {
        self.party.legal_name = Some(name.into());
        self
    }

    pub fn legal_form(mut self, form: impl Into<String>) -> Self {
        self.party.legal_form = Some(form.into());
        self
    }

    pub fn share_capital(mut self, capital: impl Into<String>) -> Self {
        self.party.share_capital = Some(capital.into());
        self
    }

    pub fn rcs_city(mut self, city: impl Into<String>) -> Self {
        self.party.rcs_city = Some(city.into());
        self
    }

    pub fn vat_number(mut self, vat: impl Into<String>) -> Self {
        self.party.vat_number = Some(vat.into());
        self
    }

    pub fn siren(mut self, siren: impl Into<String>) -> Self {
        self.party.siren = Some(siren.into());
        self
    }

    pub fn siret(mut self, siret: impl Into<String>) -> Self {
        self.party.siret = Some(siret.into());
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.party.address = Some(address);
        self
    }

    pub fn delivery_channel(mut self, scheme: impl Into<String>, id: impl Into<String>) -> Self {
        self.party.delivery_channel = Some(ElectronicChannel {
            scheme: scheme.into(),
            id: id.into(),
        });
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.party.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.party.phone = Some(phone.into());
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for Address.
pub struct AddressBuilder {
    street: Option<String>,
    city: String,
    postal_code: String,
    country_code: String,
}

impl AddressBuilder {
    pub fn new(
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            street: None,
            city: city.into(),
            postal_code: postal_code.into(),
            country_code: country_code.into(),
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country_code: self.country_code,
        }
    }
}

/// Builder for a document line; computes the derived amounts.
pub struct LineBuilder {
    description: String,
    product_code: Option<String>,
    unit_code: Option<String>,
    quantity: Decimal,
    unit_price: Decimal,
    vat_rate: Decimal,
}

impl LineBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            product_code: None,
            unit_code: None,
            quantity,
            unit_price,
            // French standard rate unless overridden.
            vat_rate: dec!(20),
        }
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    pub fn product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn unit_code(mut self, code: impl Into<String>) -> Self {
        self.unit_code = Some(code.into());
        self
    }

    pub fn build(self) -> DocumentLine {
        let amounts = compute_line(self.quantity, self.unit_price, self.vat_rate);
        DocumentLine {
            description: self.description,
            product_code: self.product_code,
            unit_code: self.unit_code,
            quantity: self.quantity,
            unit_price: self.unit_price,
            vat_rate: self.vat_rate,
            net: amounts.net,
            vat_amount: amounts.vat_amount,
            line_total: amounts.line_total,
        }
    }
}

//! FacturaE 3.2.1 generation for Spain.
//!
//! Covers the file header, party identification, invoice header/totals
//! and items. Narrower than the France generator by design — the schema's
//! optional payment and tax-breakdown sections are not emitted yet.

use super::xml_utils::{XmlResult, XmlWriter, format_decimal, format_iso_date};
use super::{FACTURAE_NS, FACTURAE_SCHEMA_VERSION};
use crate::core::{
    Document, DocumentType, Jurisdiction, Party, validate_for_jurisdiction, validation_error,
};

/// Generate FacturaE 3.2.1 XML for a Spanish document.
pub fn to_facturae_xml(document: &Document) -> XmlResult {
    let errors = validate_for_jurisdiction(
        Jurisdiction::SpainFacturae,
        &document.seller,
        &document.buyer,
    );
    if !errors.is_empty() {
        return Err(validation_error(&errors));
    }

    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs("fe:Facturae", &[("xmlns:fe", FACTURAE_NS)])?;

    // --- FileHeader ---
    w.start_element("FileHeader")?;
    w.text_element("SchemaVersion", FACTURAE_SCHEMA_VERSION)?;
    // Individual modality, issued by the seller (emisor).
    w.text_element("Modality", "I")?;
    w.text_element("InvoiceIssuerType", "EM")?;
    w.end_element("FileHeader")?;

    // --- Parties ---
    w.start_element("Parties")?;
    write_party(&mut w, &document.seller, "SellerParty")?;
    write_party(&mut w, &document.buyer, "BuyerParty")?;
    w.end_element("Parties")?;

    // --- Invoices ---
    w.start_element("Invoices")?;
    w.start_element("Invoice")?;

    w.start_element("InvoiceHeader")?;
    w.text_element("InvoiceNumber", &document.number)?;
    let class = match document.document_type {
        DocumentType::Invoice => "OO",
        DocumentType::CreditNote => "OR",
    };
    w.text_element("InvoiceClass", class)?;
    w.text_element("InvoiceDocumentType", "FC")?;
    w.end_element("InvoiceHeader")?;

    w.start_element("InvoiceIssueData")?;
    w.text_element("IssueDate", &format_iso_date(document.issue_date))?;
    w.text_element("InvoiceCurrencyCode", &document.currency)?;
    w.end_element("InvoiceIssueData")?;

    w.start_element("InvoiceTotals")?;
    w.text_element("TotalGrossAmount", &format_decimal(document.totals.gross))?;
    w.end_element("InvoiceTotals")?;

    w.start_element("Items")?;
    for line in &document.lines {
        w.start_element("InvoiceLine")?;
        w.text_element("ItemDescription", &line.description)?;
        w.text_element("TotalCost", &format_decimal(line.line_total))?;
        w.end_element("InvoiceLine")?;
    }
    w.end_element("Items")?;

    w.end_element("Invoice")?;
    w.end_element("Invoices")?;
    w.end_element("fe:Facturae")?;

    w.into_string()
}

fn write_party(
    w: &mut XmlWriter,
    party: &Party,
    element: &str,
) -> Result<(), crate::core::FactureError> {
    w.start_element(element)?;

    w.start_element("TaxIdentification")?;
    // Juridical person, resident — the cases this engine issues for.
    w.text_element("PersonTypeCode", "J")?;
    w.text_element("ResidenceTypeCode", "R")?;
    if let Some(vat) = &party.vat_number {
        w.text_element("TaxIdentificationNumber", vat)?;
    }
    w.end_element("TaxIdentification")?;

    w.start_element("LegalEntity")?;
    w.text_element("CorporateName", party.legal_or_trade_name())?;
    // Domestic addresses only; foreign parties would need the schema's
    // OverseasAddress branch, which this template does not cover yet.
    if let Some(address) = party.address.as_ref().filter(|a| a.country_code == "ES") {
        w.start_element("AddressInSpain")?;
        if let Some(street) = &address.street {
            w.text_element("Address", street)?;
        }
        w.text_element("PostCode", &address.postal_code)?;
        w.text_element("Town", &address.city)?;
        w.text_element("Province", &address.city)?;
        w.text_element("CountryCode", "ESP")?;
        w.end_element("AddressInSpain")?;
    }
    w.end_element("LegalEntity")?;

    w.end_element(element)?;
    Ok(())
}

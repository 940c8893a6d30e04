#![cfg(feature = "facturae")]

use chrono::NaiveDate;
use facture::core::*;
use facture::serialize;
use facture::store::MemoryStore;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn es_seller() -> Party {
    PartyBuilder::new("Ibérica")
        .legal_name("Ibérica Software SL")
        .vat_number("ESB12345678")
        .address(
            AddressBuilder::new("Madrid", "28001", "ES")
                .street("Calle de Alcalá 1")
                .build(),
        )
        .build()
}

fn es_buyer() -> Party {
    PartyBuilder::new("Comprador SA")
        .vat_number("ESA87654321")
        .address(AddressBuilder::new("Sevilla", "41001", "ES").build())
        .build()
}

fn build_document(document_type: DocumentType) -> Document {
    let store = MemoryStore::new();
    store
        .create(
            DocumentBuilder::new(document_type, date(2024, 3, 10))
                .country_of_supply("ES")
                .seller(es_seller())
                .buyer(es_buyer())
                .add_line(
                    LineBuilder::new("Licencia anual", dec!(2), dec!(300))
                        .vat_rate(dec!(21))
                        .build(),
                )
                .add_line(
                    LineBuilder::new("Soporte", dec!(1), dec!(150))
                        .vat_rate(dec!(21))
                        .build(),
                )
                .build()
                .unwrap(),
        )
        .unwrap()
}

// --- File header ---

#[test]
fn file_header_carries_schema_version_and_modality() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::Invoice)).unwrap();
    assert!(xml.contains("http://www.facturae.gob.es/formato/Versiones/Facturae/3_2_1.xml"));
    assert!(xml.contains("<SchemaVersion>3.2.1</SchemaVersion>"));
    assert!(xml.contains("<Modality>I</Modality>"));
    assert!(xml.contains("<InvoiceIssuerType>EM</InvoiceIssuerType>"));
}

// --- Parties ---

#[test]
fn parties_carry_tax_identification_and_corporate_name() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::Invoice)).unwrap();
    assert!(xml.contains("<TaxIdentificationNumber>ESB12345678</TaxIdentificationNumber>"));
    assert!(xml.contains("<TaxIdentificationNumber>ESA87654321</TaxIdentificationNumber>"));
    assert!(xml.contains("<CorporateName>Ibérica Software SL</CorporateName>"));
    assert!(xml.contains("<PersonTypeCode>J</PersonTypeCode>"));
}

#[test]
fn spanish_address_is_emitted_in_spain_block() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::Invoice)).unwrap();
    assert!(xml.contains("<AddressInSpain>"));
    assert!(xml.contains("<PostCode>28001</PostCode>"));
    assert!(xml.contains("<Town>Madrid</Town>"));
    assert!(xml.contains("<CountryCode>ESP</CountryCode>"));
}

// --- Invoice body ---

#[test]
fn invoice_header_and_issue_data() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::Invoice)).unwrap();
    assert!(xml.contains("<InvoiceNumber>INV-2024-1001</InvoiceNumber>"));
    assert!(xml.contains("<InvoiceClass>OO</InvoiceClass>"));
    assert!(xml.contains("<IssueDate>2024-03-10</IssueDate>"));
    assert!(xml.contains("<InvoiceCurrencyCode>EUR</InvoiceCurrencyCode>"));
}

#[test]
fn credit_note_is_rectificative_class() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::CreditNote)).unwrap();
    assert!(xml.contains("<InvoiceClass>OR</InvoiceClass>"));
}

#[test]
fn totals_and_items_carry_gross_amounts() {
    let xml = serialize::to_facturae_xml(&build_document(DocumentType::Invoice)).unwrap();
    // 600 + 150 = 750 net; 21% VAT = 157.50; gross 907.50
    assert!(xml.contains("<TotalGrossAmount>907.50</TotalGrossAmount>"));
    // Per-line gross: 600 × 1.21 = 726.00 and 150 × 1.21 = 181.50
    assert!(xml.contains("<TotalCost>726.00</TotalCost>"));
    assert!(xml.contains("<TotalCost>181.50</TotalCost>"));
    assert!(xml.contains("<ItemDescription>Licencia anual</ItemDescription>"));
}

// --- Mandatory fields ---

#[test]
fn missing_tax_identifications_raise_validation_error() {
    let store = MemoryStore::new();
    let doc = store
        .create(
            DocumentBuilder::new(DocumentType::Invoice, date(2024, 3, 10))
                .country_of_supply("ES")
                .seller(PartyBuilder::new("Ibérica").build())
                .buyer(PartyBuilder::new("Comprador SA").build())
                .add_line(LineBuilder::new("Licencia", dec!(1), dec!(100)).build())
                .build()
                .unwrap(),
        )
        .unwrap();

    let err = serialize::to_facturae_xml(&doc).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, FactureError::Validation(_)));
    assert!(msg.contains("seller.vat_number"));
    assert!(msg.contains("buyer.vat_number"));
}

// --- Purity / registry ---

#[test]
fn serialization_is_idempotent() {
    let doc = build_document(DocumentType::Invoice);
    assert_eq!(
        serialize::to_facturae_xml(&doc).unwrap(),
        serialize::to_facturae_xml(&doc).unwrap()
    );
}

#[test]
fn registry_selects_facturae_for_spain() {
    let xml = serialize::serialize(&build_document(DocumentType::Invoice)).unwrap();
    assert!(xml.contains("fe:Facturae"));
}

//! Input and jurisdiction validation.
//!
//! Validation runs before any write and accumulates every finding rather
//! than stopping at the first. Jurisdiction checks are a precondition of
//! serialization: a document that fails them is rejected instead of being
//! rendered with placeholder data.

use super::error::FieldError;
use super::types::{Address, DocumentLine, Jurisdiction, Party};
use super::{countries, currencies};

/// Validate the caller-supplied pieces of a new or edited document.
pub fn validate_document_input(
    currency: &str,
    country_of_supply: &str,
    seller: &Party,
    buyer: &Party,
    lines: &[DocumentLine],
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if currency.len() != 3 || !currencies::is_known_currency_code(currency) {
        errors.push(FieldError::new(
            "currency",
            format!("'{currency}' is not a known ISO 4217 currency code"),
        ));
    }

    if country_of_supply.len() != 2 || !countries::is_known_country_code(country_of_supply) {
        errors.push(FieldError::new(
            "country_of_supply",
            format!("'{country_of_supply}' is not a known ISO 3166-1 alpha-2 code"),
        ));
    }

    if seller.name.trim().is_empty() {
        errors.push(FieldError::new("seller.name", "name must not be empty"));
    }
    if buyer.name.trim().is_empty() {
        errors.push(FieldError::new(
            "buyer.name",
            "a customer must be selected before saving",
        ));
    }

    if let Some(addr) = &seller.address {
        validate_address(addr, "seller.address", &mut errors);
    }
    if let Some(addr) = &buyer.address {
        validate_address(addr, "buyer.address", &mut errors);
    }

    if let Some(vat) = &seller.vat_number {
        validate_vat_number(vat, "seller.vat_number", &mut errors);
    }
    if let Some(vat) = &buyer.vat_number {
        validate_vat_number(vat, "buyer.vat_number", &mut errors);
    }
    if let Some(siren) = &seller.siren {
        if !is_digits(siren, 9) {
            errors.push(FieldError::new(
                "seller.siren",
                "SIREN must be exactly 9 digits",
            ));
        }
    }
    if let Some(siret) = &seller.siret {
        if !is_digits(siret, 14) {
            errors.push(FieldError::new(
                "seller.siret",
                "SIRET must be exactly 14 digits",
            ));
        }
    }

    if lines.is_empty() {
        errors.push(FieldError::new("lines", "at least one line is required"));
    }
    for (i, line) in lines.iter().enumerate() {
        validate_line(line, i, &mut errors);
    }

    errors
}

/// Mandatory-field validation for the target serialization standard.
///
/// France requires the seller's legal identifiers and a resolved postal
/// address — missing data is an error here, never substituted downstream.
pub fn validate_for_jurisdiction(
    jurisdiction: Jurisdiction,
    seller: &Party,
    buyer: &Party,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match jurisdiction {
        Jurisdiction::FranceCii => {
            if seller.legal_or_trade_name().trim().is_empty() {
                errors.push(FieldError::new(
                    "seller.legal_name",
                    "seller legal name is required for Factur-X",
                ));
            }
            if seller.vat_number.is_none() {
                errors.push(FieldError::new(
                    "seller.vat_number",
                    "seller VAT number is required for Factur-X",
                ));
            }
            if seller.siret.is_none() {
                errors.push(FieldError::new(
                    "seller.siret",
                    "seller SIRET is required for Factur-X",
                ));
            }
            if seller.address.is_none() {
                errors.push(FieldError::new(
                    "seller.address",
                    "a resolved seller address is required for Factur-X",
                ));
            }
            if buyer.name.trim().is_empty() {
                errors.push(FieldError::new(
                    "buyer.name",
                    "buyer name is required for Factur-X",
                ));
            }
        }
        Jurisdiction::SpainFacturae => {
            if seller.vat_number.is_none() {
                errors.push(FieldError::new(
                    "seller.vat_number",
                    "seller tax identification is required for FacturaE",
                ));
            }
            if buyer.vat_number.is_none() {
                errors.push(FieldError::new(
                    "buyer.vat_number",
                    "buyer tax identification is required for FacturaE",
                ));
            }
            if seller.legal_or_trade_name().trim().is_empty() {
                errors.push(FieldError::new(
                    "seller.legal_name",
                    "seller corporate name is required for FacturaE",
                ));
            }
        }
    }

    errors
}

fn validate_address(address: &Address, prefix: &str, errors: &mut Vec<FieldError>) {
    if address.city.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.city"),
            "city must not be empty",
        ));
    }
    if address.postal_code.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.postal_code"),
            "postal code must not be empty",
        ));
    }
    if address.country_code.len() != 2 || !countries::is_known_country_code(&address.country_code) {
        errors.push(FieldError::new(
            format!("{prefix}.country_code"),
            format!(
                "country code '{}' is not a known ISO 3166-1 alpha-2 code",
                address.country_code
            ),
        ));
    }
}

fn validate_line(line: &DocumentLine, index: usize, errors: &mut Vec<FieldError>) {
    let prefix = format!("lines[{index}]");

    if line.description.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.description"),
            "description must not be empty",
        ));
    }
    if line.quantity.is_zero() {
        errors.push(FieldError::new(
            format!("{prefix}.quantity"),
            "quantity must not be zero",
        ));
    }
    if line.unit_price.is_sign_negative() {
        errors.push(FieldError::new(
            format!("{prefix}.unit_price"),
            "unit price must not be negative",
        ));
    }
    if line.vat_rate.is_sign_negative() {
        errors.push(FieldError::new(
            format!("{prefix}.vat_rate"),
            "VAT rate must not be negative",
        ));
    }
}

/// Basic VAT id shape: 2-letter country code + identifier, with stricter
/// checks for the jurisdictions we serialize.
fn validate_vat_number(vat: &str, field: &str, errors: &mut Vec<FieldError>) {
    if vat.len() < 4 {
        errors.push(FieldError::new(
            field,
            format!("VAT number '{vat}' too short — expected 2-letter country code + identifier"),
        ));
        return;
    }

    let prefix = &vat[..2];
    if !prefix.bytes().all(|b| b.is_ascii_uppercase()) {
        errors.push(FieldError::new(
            field,
            format!("VAT number must start with a 2-letter country code, got '{prefix}'"),
        ));
        return;
    }

    // French VAT ids: FR + 2 check characters + 9-digit SIREN.
    if prefix == "FR" {
        let rest = &vat[2..];
        if rest.len() != 11 || !rest[2..].bytes().all(|b| b.is_ascii_digit()) {
            errors.push(FieldError::new(
                field,
                format!("French VAT number must be FR + 2 check chars + 9 digits, got '{vat}'"),
            ));
        }
    }

    // Spanish NIF-based ids: ES + 9 characters.
    if prefix == "ES" && vat.len() != 11 {
        errors.push(FieldError::new(
            field,
            format!("Spanish VAT number must be ES + 9 characters, got '{vat}'"),
        ));
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

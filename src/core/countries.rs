//! ISO 3166-1 alpha-2 country code validation.
//!
//! Covers the EU/EEA plus the trading partners relevant to French and
//! Spanish e-invoicing.

/// Check whether `code` is a known ISO 3166-1 alpha-2 country code.
pub fn is_known_country_code(code: &str) -> bool {
    COUNTRY_CODES.binary_search(&code).is_ok()
}

/// Sorted for binary search.
static COUNTRY_CODES: &[&str] = &[
    "AD", "AT", "AU", "BE", "BG", "BR", "CA", "CH", "CN", "CY", "CZ", "DE", "DK", "EE", "ES",
    "FI", "FR", "GB", "GR", "HR", "HU", "IE", "IN", "IS", "IT", "JP", "LI", "LT", "LU", "LV",
    "MA", "MC", "MT", "MX", "NL", "NO", "PL", "PT", "RO", "SE", "SG", "SI", "SK", "TN", "TR",
    "US",
];

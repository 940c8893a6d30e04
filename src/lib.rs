//! # facture
//!
//! E-invoicing engine for businesses issuing under French/EU rules:
//! document model, concurrent number allocation, Factur-X (CII) and
//! FacturaE generation, and a portal dispatch contract.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! The France mapping follows the [EN 16931](https://standards.cencenelec.eu/dyn/www/f?p=205:110:0::::FSP_PROJECT:60602) semantic model.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use facture::core::*;
//! use facture::store::MemoryStore;
//! use rust_decimal_macros::dec;
//!
//! let seller = PartyBuilder::new("ACME")
//!     .legal_name("ACME SAS")
//!     .vat_number("FR32123456789")
//!     .siret("12345678900017")
//!     .address(AddressBuilder::new("Paris", "75001", "FR").street("1 rue de Rivoli").build())
//!     .build();
//! let buyer = PartyBuilder::new("Client SARL")
//!     .address(AddressBuilder::new("Lyon", "69001", "FR").build())
//!     .build();
//!
//! let new_doc = DocumentBuilder::new(DocumentType::Invoice, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .seller(seller)
//!     .buyer(buyer)
//!     .add_line(LineBuilder::new("Conseil", dec!(10), dec!(150)).vat_rate(dec!(20)).build())
//!     .build()
//!     .unwrap();
//!
//! let store = MemoryStore::new();
//! let doc = store.create(new_doc).unwrap();
//! assert_eq!(doc.number, "INV-2024-1001");
//! assert_eq!(doc.totals.gross, dec!(1800.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document types, totals, validation, numbering, store |
//! | `facturx` | France Factur-X / CII generation |
//! | `facturae` | Spain FacturaE 3.2.1 generation |
//! | `dispatch` | Portal client contract + XML archive |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod store;

#[cfg(feature = "xml")]
pub mod serialize;

#[cfg(feature = "dispatch")]
pub mod dispatch;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

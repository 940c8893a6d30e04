//! Jurisdiction XML serialization.
//!
//! One entry point, [`serialize`], maps a document onto its country's
//! e-invoicing standard. The supported standards form a closed set
//! ([`Jurisdiction`]); each generator is a pure function of the document,
//! so repeated serialization is byte-identical and never touches stored
//! state.
//!
//! # Example
//!
//! ```no_run
//! use facture::core::Document;
//! use facture::serialize;
//!
//! let document: Document = todo!(); // created via the store
//! let xml = serialize::serialize(&document).unwrap();
//! ```

#[cfg(feature = "facturae")]
mod facturae;
#[cfg(feature = "facturx")]
mod facturx;
pub(crate) mod xml_utils;

#[cfg(feature = "facturae")]
pub use facturae::to_facturae_xml;
#[cfg(feature = "facturx")]
pub use facturx::to_facturx_xml;
pub use xml_utils::XmlResult;

use crate::core::{Document, Jurisdiction};

/// Guideline identifier carried in the Factur-X document context (BT-24).
pub const FACTURX_EN16931_GUIDELINE: &str = "urn:cen.eu:en16931:2017";

/// FacturaE schema namespace and version.
pub const FACTURAE_NS: &str = "http://www.facturae.gob.es/formato/Versiones/Facturae/3_2_1.xml";
pub const FACTURAE_SCHEMA_VERSION: &str = "3.2.1";

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

/// Serialize a document with the standard selected by its country of
/// supply. Mandatory-field validation for the chosen standard runs before
/// any output is produced.
pub fn serialize(document: &Document) -> XmlResult {
    let jurisdiction = Jurisdiction::resolve(&document.country_of_supply)?;
    match jurisdiction {
        #[cfg(feature = "facturx")]
        Jurisdiction::FranceCii => facturx::to_facturx_xml(document),
        #[cfg(feature = "facturae")]
        Jurisdiction::SpainFacturae => facturae::to_facturae_xml(document),
        #[allow(unreachable_patterns)]
        other => Err(crate::core::FactureError::UnsupportedJurisdiction(format!(
            "{other:?} (serializer feature not enabled)"
        ))),
    }
}

//! Factur-X / CII generation for France.
//!
//! Output follows the UN/CEFACT Cross Industry Invoice D16B schema with
//! the EN 16931 element ordering. The generator is a pure function of the
//! document — serializing twice yields byte-identical XML.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::xml_utils::{XmlResult, XmlWriter, format_cii_date, format_decimal};
use super::{FACTURX_EN16931_GUIDELINE, cii_ns};
use crate::core::totals::round_half_up;
use crate::core::{
    Document, DocumentLine, Jurisdiction, Party, validate_for_jurisdiction, validation_error,
};

/// Generate Factur-X CII XML for a French document.
///
/// Mandatory seller legal fields (legal name, VAT number, SIRET, resolved
/// address) are enforced up front — missing data is a validation error,
/// never replaced by placeholders.
pub fn to_facturx_xml(document: &Document) -> XmlResult {
    let errors = validate_for_jurisdiction(
        Jurisdiction::FranceCii,
        &document.seller,
        &document.buyer,
    );
    if !errors.is_empty() {
        return Err(validation_error(&errors));
    }

    let currency = document.currency.as_str();
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element("rsm:ExchangedDocumentContext")?;
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", FACTURX_EN16931_GUIDELINE)?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // --- ExchangedDocument ---
    w.start_element("rsm:ExchangedDocument")?;
    w.text_element("ram:ID", &document.number)?;
    w.text_element("ram:TypeCode", &document.document_type.code().to_string())?;
    w.start_element("ram:IssueDateTime")?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &format_cii_date(document.issue_date),
        &[("format", "102")],
    )?;
    w.end_element("ram:IssueDateTime")?;
    // French legal mentions note (company identity line).
    w.start_element("ram:IncludedNote")?;
    w.text_element("ram:Content", &legal_note(&document.seller))?;
    w.end_element("ram:IncludedNote")?;
    if let Some(notes) = &document.notes {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", notes)?;
        w.end_element("ram:IncludedNote")?;
    }
    w.end_element("rsm:ExchangedDocument")?;

    // --- SupplyChainTradeTransaction ---
    w.start_element("rsm:SupplyChainTradeTransaction")?;

    for (i, line) in document.lines.iter().enumerate() {
        write_line(&mut w, line, i + 1)?;
    }

    // --- ApplicableHeaderTradeAgreement ---
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    // EN 16931 wants the purchase order both as a direct buyer reference
    // and as an order reference document; some validators check each.
    if let Some(reference) = document
        .buyer_reference
        .as_deref()
        .or(document.order_reference.as_deref())
    {
        w.text_element("ram:BuyerReference", reference)?;
    }
    write_party(&mut w, &document.seller, "ram:SellerTradeParty")?;
    write_party(&mut w, &document.buyer, "ram:BuyerTradeParty")?;
    if let Some(order) = &document.order_reference {
        w.start_element("ram:BuyerOrderReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", order)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    // --- ApplicableHeaderTradeDelivery ---
    // Tax point date (date of supply), falling back to the issue date.
    let supply_date = document.tax_point_date.unwrap_or(document.issue_date);
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    w.start_element("ram:ActualDeliverySupplyChainEvent")?;
    w.start_element("ram:OccurrenceDateTime")?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &format_cii_date(supply_date),
        &[("format", "102")],
    )?;
    w.end_element("ram:OccurrenceDateTime")?;
    w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    // --- ApplicableHeaderTradeSettlement ---
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    w.text_element("ram:InvoiceCurrencyCode", currency)?;

    w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    w.text_element(
        "ram:TypeCode",
        &document.payment_means.code().to_string(),
    )?;
    w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;

    // VAT breakdown grouped by rate (standard category).
    for (rate, basis) in vat_basis_by_rate(&document.lines) {
        let tax = round_half_up(basis * rate / dec!(100), 2);
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:CalculatedAmount", &format_decimal(tax))?;
        w.text_element("ram:TypeCode", "VAT")?;
        w.text_element("ram:BasisAmount", &format_decimal(basis))?;
        w.text_element("ram:CategoryCode", "S")?;
        w.text_element("ram:RateApplicablePercent", &format_decimal(rate))?;
        w.end_element("ram:ApplicableTradeTax")?;
    }

    if document.terms.is_some() || document.due_date.is_some() {
        w.start_element("ram:SpecifiedTradePaymentTerms")?;
        if let Some(terms) = &document.terms {
            w.text_element("ram:Description", terms)?;
        }
        if let Some(due) = document.due_date {
            w.start_element("ram:DueDateDateTime")?;
            w.text_element_with_attrs(
                "udt:DateTimeString",
                &format_cii_date(due),
                &[("format", "102")],
            )?;
            w.end_element("ram:DueDateDateTime")?;
        }
        w.end_element("ram:SpecifiedTradePaymentTerms")?;
    }

    let totals = &document.totals;
    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.amount_element("ram:LineTotalAmount", totals.net, currency)?;
    w.amount_element("ram:TaxBasisTotalAmount", totals.net, currency)?;
    w.amount_element("ram:TaxTotalAmount", totals.tax, currency)?;
    w.amount_element("ram:GrandTotalAmount", totals.gross, currency)?;
    w.amount_element("ram:DuePayableAmount", totals.gross, currency)?;
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryInvoice")?;

    w.into_string()
}

/// French legal mentions: legal name, legal form, share capital, trade
/// register city, SIRET — present segments only.
fn legal_note(seller: &Party) -> String {
    let mut segments: Vec<String> = vec![seller.legal_or_trade_name().to_string()];
    if let Some(form) = &seller.legal_form {
        segments.push(form.clone());
    }
    if let Some(capital) = &seller.share_capital {
        segments.push(format!("capital of {capital}"));
    }
    if let Some(city) = &seller.rcs_city {
        segments.push(format!("RCS {city}"));
    }
    if let Some(siret) = &seller.siret {
        segments.push(format!("SIRET {siret}"));
    }
    segments.join(" - ")
}

fn write_party(w: &mut XmlWriter, party: &Party, element: &str) -> Result<(), crate::core::FactureError> {
    // CII requires strict order within TradeParty: Name →
    // SpecifiedLegalOrganization → PostalTradeAddress →
    // URIUniversalCommunication → SpecifiedTaxRegistration.
    w.start_element(element)?;
    w.text_element("ram:Name", party.legal_or_trade_name())?;

    if let Some(siret) = &party.siret {
        w.start_element("ram:SpecifiedLegalOrganization")?;
        w.text_element_with_attrs("ram:ID", siret, &[("schemeID", "0002")])?;
        w.end_element("ram:SpecifiedLegalOrganization")?;
    }

    if let Some(address) = &party.address {
        w.start_element("ram:PostalTradeAddress")?;
        w.text_element("ram:PostcodeCode", &address.postal_code)?;
        if let Some(street) = &address.street {
            w.text_element("ram:LineOne", street)?;
        }
        w.text_element("ram:CityName", &address.city)?;
        w.text_element("ram:CountryID", &address.country_code)?;
        w.end_element("ram:PostalTradeAddress")?;
    }

    if let Some(channel) = &party.delivery_channel {
        w.start_element("ram:URIUniversalCommunication")?;
        w.text_element_with_attrs("ram:URIID", &channel.id, &[("schemeID", channel.scheme.as_str())])?;
        w.end_element("ram:URIUniversalCommunication")?;
    }

    if let Some(vat) = &party.vat_number {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs("ram:ID", vat, &[("schemeID", "VA")])?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(element)?;
    Ok(())
}

fn write_line(
    w: &mut XmlWriter,
    line: &DocumentLine,
    line_id: usize,
) -> Result<(), crate::core::FactureError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line_id.to_string())?;
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    if let Some(code) = &line.product_code {
        w.text_element_with_attrs("ram:GlobalID", code, &[("schemeID", "0160")])?;
    }
    w.text_element("ram:Name", &line.description)?;
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.text_element("ram:ChargeAmount", &format_decimal(line.unit_price))?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element(
        "ram:BilledQuantity",
        line.quantity,
        line.unit_code.as_deref().unwrap_or("C62"),
    )?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    // Simplified category mapping: standard rate only. Zero-rated and
    // exempt categories are not yet modelled.
    w.start_element("ram:ApplicableTradeTax")?;
    w.text_element("ram:TypeCode", "VAT")?;
    w.text_element("ram:CategoryCode", "S")?;
    w.text_element("ram:RateApplicablePercent", &format_decimal(line.vat_rate))?;
    w.end_element("ram:ApplicableTradeTax")?;
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.text_element("ram:LineTotalAmount", &format_decimal(line.net))?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

/// Group taxable bases by VAT rate, sorted by rate for stable output.
fn vat_basis_by_rate(lines: &[DocumentLine]) -> Vec<(Decimal, Decimal)> {
    let mut groups: Vec<(Decimal, Decimal)> = Vec::new();
    for line in lines {
        match groups.iter_mut().find(|(rate, _)| *rate == line.vat_rate) {
            Some((_, basis)) => *basis += line.net,
            None => groups.push((line.vat_rate, line.net)),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

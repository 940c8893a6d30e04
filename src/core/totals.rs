//! Line and header amount computation.
//!
//! Totals are an invariant of the lines: they are always recomputed here,
//! never taken from caller-supplied figures. All amounts are rounded to
//! 2 decimal places with commercial (half-up) rounding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{DocumentLine, Totals};

/// Amounts derived from one line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub net: Decimal,
    pub vat_amount: Decimal,
    pub line_total: Decimal,
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the derived amounts for a single line.
///
/// `net = quantity × unit_price`, `vat = net × rate / 100`,
/// `total = net + vat`; net and vat are rounded independently so the
/// line total is exactly their sum.
pub fn compute_line(quantity: Decimal, unit_price: Decimal, vat_rate: Decimal) -> LineAmounts {
    let net = round_half_up(quantity * unit_price, 2);
    let vat_amount = round_half_up(net * vat_rate / dec!(100), 2);
    LineAmounts {
        net,
        vat_amount,
        line_total: net + vat_amount,
    }
}

/// Sum per-line amounts into header totals.
pub fn compute_totals(lines: &[DocumentLine]) -> Totals {
    let mut totals = Totals::default();
    for line in lines {
        totals.net += line.net;
        totals.tax += line.vat_amount;
        totals.gross += line.line_total;
    }
    totals
}

//! Property-based tests for totals and number allocation.

use facture::core::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Generate a reasonable price (0.01 to 99999.99).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Generate a reasonable quantity (1 to 100).
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1u32..=100u32).prop_map(Decimal::from)
}

/// Generate a French VAT rate.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(dec!(0)),
        Just(dec!(2.1)),
        Just(dec!(5.5)),
        Just(dec!(10)),
        Just(dec!(20)),
    ]
}

fn arb_line() -> impl Strategy<Value = DocumentLine> {
    (arb_quantity(), arb_price(), arb_rate()).prop_map(|(qty, price, rate)| {
        LineBuilder::new("Prestation", qty, price)
            .vat_rate(rate)
            .build()
    })
}

fn arb_lines() -> impl Strategy<Value = Vec<DocumentLine>> {
    prop::collection::vec(arb_line(), 1..=8)
}

// ── Totals properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn gross_is_always_net_plus_tax(lines in arb_lines()) {
        let totals = compute_totals(&lines);
        prop_assert_eq!(totals.gross, totals.net + totals.tax);
    }

    #[test]
    fn header_totals_are_sums_of_line_amounts(lines in arb_lines()) {
        let totals = compute_totals(&lines);
        let net: Decimal = lines.iter().map(|l| l.net).sum();
        let tax: Decimal = lines.iter().map(|l| l.vat_amount).sum();
        let gross: Decimal = lines.iter().map(|l| l.line_total).sum();
        prop_assert_eq!(totals.net, net);
        prop_assert_eq!(totals.tax, tax);
        prop_assert_eq!(totals.gross, gross);
    }

    #[test]
    fn amounts_have_at_most_two_decimal_places(lines in arb_lines()) {
        for line in &lines {
            prop_assert_eq!(line.net, line.net.round_dp(2));
            prop_assert_eq!(line.vat_amount, line.vat_amount.round_dp(2));
            prop_assert_eq!(line.line_total, line.line_total.round_dp(2));
        }
        let totals = compute_totals(&lines);
        prop_assert_eq!(totals.gross, totals.gross.round_dp(2));
    }

    #[test]
    fn line_total_is_net_plus_vat(qty in arb_quantity(), price in arb_price(), rate in arb_rate()) {
        let amounts = compute_line(qty, price, rate);
        prop_assert_eq!(amounts.line_total, amounts.net + amounts.vat_amount);
    }
}

// ── Allocator properties ────────────────────────────────────────────────────

#[derive(Default)]
struct SetIndex {
    taken: std::collections::HashSet<String>,
}

impl NumberIndex for SetIndex {
    fn is_taken(&self, number: &str) -> bool {
        self.taken.contains(number)
    }

    fn count_in_scope(&self, _scope: SequenceScope) -> usize {
        self.taken.len()
    }
}

fn arb_requested() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[A-Z]{1,4}-2024-[0-9]{1,3}".prop_map(Some),
        "[A-Za-z]{1,10}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn repeated_allocation_never_duplicates(requests in prop::collection::vec(arb_requested(), 1..40)) {
        let scope = SequenceScope::new(
            DocumentType::Invoice,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        );
        let config = AllocatorConfig::default();
        let mut index = SetIndex::default();

        for requested in requests {
            let number = allocate(requested.as_deref(), scope, &config, &index).unwrap();
            prop_assert!(!index.taken.contains(&number), "duplicate {}", number);
            index.taken.insert(number);
        }
    }

    #[test]
    fn allocation_is_deterministic(requested in arb_requested(), taken in prop::collection::hash_set("[A-Z]{1,3}-2024-[0-9]{1,2}", 0..10)) {
        let scope = SequenceScope::new(
            DocumentType::Invoice,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        );
        let config = AllocatorConfig::default();
        let index = SetIndex { taken: taken.into_iter().collect() };

        let first = allocate(requested.as_deref(), scope, &config, &index).unwrap();
        let second = allocate(requested.as_deref(), scope, &config, &index).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn structured_resolution_stays_in_family(n in 1u32..500) {
        let scope = SequenceScope::new(
            DocumentType::Invoice,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        );
        let config = AllocatorConfig::default();
        let requested = format!("FAC-2024-{n}");
        let mut index = SetIndex::default();
        index.taken.insert(requested.clone());

        let number = allocate(Some(&requested), scope, &config, &index).unwrap();
        prop_assert_eq!(number, format!("FAC-2024-{}", n + 1));
    }
}

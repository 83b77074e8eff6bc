//! Amount policies.
//!
//! Two business rules decide which records reach the output:
//!
//! | Policy | Excludes |
//! |--------|----------|
//! | [`AmountPolicy::NonNumericAmount`] | cells that do not parse as a finite number |
//! | [`AmountPolicy::ZeroAmount`] | amounts equal to exactly `0` |
//!
//! Exclusions are counted, never raised.

use serde::Serialize;

use crate::models::LongRecord;

use super::fields::KeyedRecord;

/// A named exclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AmountPolicy {
    NonNumericAmount,
    ZeroAmount,
}

impl AmountPolicy {
    pub fn description(&self) -> &'static str {
        match self {
            Self::NonNumericAmount => "amount is not a finite number",
            Self::ZeroAmount => "amount is zero",
        }
    }
}

/// Records that survived both policies, with per-policy drop counts.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<LongRecord>,
    pub dropped_non_numeric: usize,
    pub dropped_zero: usize,
}

/// Parse a cell as a finite `f64`, ignoring surrounding whitespace.
pub fn coerce_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// [`AmountPolicy::NonNumericAmount`]: type the amount or drop the record.
pub fn drop_non_numeric(records: Vec<KeyedRecord>) -> (Vec<LongRecord>, usize) {
    let total = records.len();
    let typed: Vec<LongRecord> = records
        .into_iter()
        .filter_map(|record| {
            let amount = coerce_amount(&record.raw_amount)?;
            Some(LongRecord {
                order_id: record.order_id,
                segment: record.segment,
                ship_mode: record.ship_mode,
                amount,
            })
        })
        .collect();
    let dropped = total - typed.len();
    (typed, dropped)
}

/// [`AmountPolicy::ZeroAmount`]: drop records whose amount is exactly zero.
pub fn drop_zero_amounts(records: Vec<LongRecord>) -> (Vec<LongRecord>, usize) {
    let total = records.len();
    let kept: Vec<LongRecord> = records.into_iter().filter(|r| r.amount != 0.0).collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Apply both policies in order: numeric coercion, then zero exclusion.
pub fn apply_amount_policies(records: Vec<KeyedRecord>) -> FilterOutcome {
    let (typed, dropped_non_numeric) = drop_non_numeric(records);
    let (records, dropped_zero) = drop_zero_amounts(typed);
    FilterOutcome {
        records,
        dropped_non_numeric,
        dropped_zero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(amount: &str) -> KeyedRecord {
        KeyedRecord {
            order_id: "CA-1".into(),
            segment: "Consumer".into(),
            ship_mode: "Total".into(),
            raw_amount: amount.into(),
        }
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("120.50"), Some(120.5));
        assert_eq!(coerce_amount(" 42 "), Some(42.0));
        assert_eq!(coerce_amount("-3.25"), Some(-3.25));
        assert_eq!(coerce_amount("1e3"), Some(1000.0));
    }

    #[test]
    fn test_coerce_amount_rejects_text_and_non_finite() {
        for raw in ["N/A", "", "  ", "1,234", "$5", "inf", "-inf", "NaN"] {
            assert_eq!(coerce_amount(raw), None, "{:?} should not coerce", raw);
        }
    }

    #[test]
    fn test_non_numeric_dropped_silently() {
        let (records, dropped) = drop_non_numeric(vec![keyed("N/A"), keyed("7")]);
        assert_eq!(dropped, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 7.0);
    }

    #[test]
    fn test_zero_amounts_dropped() {
        let outcome = apply_amount_policies(vec![keyed("0"), keyed("0.0"), keyed("-0"), keyed("5")]);
        assert_eq!(outcome.dropped_zero, 3);
        assert_eq!(outcome.dropped_non_numeric, 0);
        assert!(outcome.records.iter().all(|r| r.amount != 0.0));
    }

    #[test]
    fn test_small_non_zero_amount_kept() {
        let outcome = apply_amount_policies(vec![keyed("0.001")]);
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_policy_descriptions() {
        assert!(AmountPolicy::ZeroAmount.description().contains("zero"));
        assert!(AmountPolicy::NonNumericAmount.description().contains("number"));
    }
}

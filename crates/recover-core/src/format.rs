//! INR currency formatting
//!
//! Amounts use en-IN digit grouping (`₹15,00,000`) with no decimals. The
//! three presentation contexts have separate zero and notation rules, so each
//! is its own `CurrencyStyle` rather than a flag on a shared one.

use serde::{Deserialize, Serialize};

/// Values above this use compact lakh/crore notation on the dashboard
pub const COMPACT_THRESHOLD: f64 = 100_000.0;

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// Where an amount is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyStyle {
    /// KPI cards: compact above the threshold, explicit `₹0` for zero
    Dashboard,
    /// Per-year totals: `-` for zero, full grouping otherwise
    YearRow,
    /// Cumulative totals: explicit `₹0` for zero, full grouping otherwise
    GrandTotal,
}

/// Format an amount for the given context
pub fn format_inr(value: f64, style: CurrencyStyle) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    match style {
        CurrencyStyle::Dashboard => {
            if value > COMPACT_THRESHOLD {
                compact(value)
            } else {
                standard(value)
            }
        }
        CurrencyStyle::YearRow => {
            if value == 0.0 {
                "-".to_string()
            } else {
                standard(value)
            }
        }
        CurrencyStyle::GrandTotal => standard(value),
    }
}

/// Full en-IN grouping, rounded to whole rupees
fn standard(value: f64) -> String {
    let digits = whole_digits(value.abs().round());
    let sign = if value < 0.0 && digits != "0" { "-" } else { "" };
    format!("{}₹{}", sign, group_indian(&digits))
}

/// One optional decimal with lakh (L) or crore (Cr) units
fn compact(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let mut scaled = round_one_decimal(abs / LAKH);
    let mut unit = "L";
    if abs >= CRORE || scaled >= 100.0 {
        scaled = round_one_decimal(abs / CRORE);
        unit = "Cr";
    }

    let whole = whole_digits(scaled.trunc());
    let tenth = ((scaled - scaled.trunc()) * 10.0).round() as u8;
    let number = if tenth == 0 {
        group_indian(&whole)
    } else {
        format!("{}.{}", group_indian(&whole), tenth)
    };

    format!("{}₹{} {}", sign, number, unit)
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Decimal digits of a whole, non-negative value
///
/// Goes through the float formatter so values past `u64::MAX` keep every digit.
fn whole_digits(value: f64) -> String {
    format!("{:.0}", value)
}

/// Group a digit string the Indian way: last three, then pairs (12,34,56,789)
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

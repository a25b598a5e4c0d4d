//! Dashboard aggregation
//!
//! Pure functions over the record store. Nothing here is cached; callers
//! recompute on every read. Malformed numeric text never raises, it counts
//! as zero.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::format::{format_inr, CurrencyStyle};
use crate::models::{Commitment, Quarter, Status, StatusGroup, YearlyOutstanding};
use crate::store::RecordStore;

/// Fixed recovery target (4 crore)
pub const TARGET_AMOUNT: f64 = 40_000_000.0;

/// Parse an editable amount field
///
/// Empty, non-numeric, non-finite and negative text all count as zero.
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Sum that saturates at `f64::MAX` instead of overflowing to infinity
fn saturating_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.sum::<f64>().min(f64::MAX)
}

/// Sum of the four quarters of one fiscal year
pub fn row_total(row: &YearlyOutstanding) -> f64 {
    saturating_sum(Quarter::all().iter().map(|q| parse_amount(row.quarter(*q))))
}

/// Sum of all row totals
pub fn grand_total(rows: &[YearlyOutstanding]) -> f64 {
    saturating_sum(rows.iter().map(row_total))
}

/// Share of the recovery target reached, clamped to `[0, 100]`
pub fn progress_percent(total: f64) -> f64 {
    let percent = total / TARGET_AMOUNT * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// The process-local calendar date
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Commitment counts per dashboard partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    /// PENDING + PARTIAL_PAYMENT
    pub active: usize,
    /// FAKE_COMMITMENT + DISHONORED
    pub critical: usize,
    /// NO_DUES
    pub resolved: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl StatusCounts {
    pub fn from_commitments(commitments: &[Commitment]) -> Self {
        let mut counts = Self {
            by_status: Status::all()
                .iter()
                .map(|s| (s.as_str().to_string(), 0))
                .collect(),
            ..Default::default()
        };

        for c in commitments {
            counts.total += 1;
            match c.status.group() {
                StatusGroup::Active => counts.active += 1,
                StatusGroup::Critical => counts.critical += 1,
                StatusGroup::Resolved => counts.resolved += 1,
            }
            *counts.by_status.entry(c.status.as_str().to_string()).or_insert(0) += 1;
        }

        counts
    }
}

/// Read-only list of today's follow-ups
///
/// Holds shared borrows only, so nothing reached through it can be edited.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PriorityView<'a> {
    rows: Vec<&'a Commitment>,
}

impl<'a> PriorityView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Commitment> + '_ {
        self.rows.iter().copied()
    }
}

/// Commitments dated `today` that are not yet cleared
pub fn due_today(commitments: &[Commitment], today: NaiveDate) -> PriorityView<'_> {
    let today = today.format("%Y-%m-%d").to_string();
    PriorityView {
        rows: commitments
            .iter()
            .filter(|c| !c.date.is_empty() && c.date.trim() == today)
            .filter(|c| c.status != Status::NoDues)
            .collect(),
    }
}

/// Headline figures for the executive dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_outstanding: f64,
    pub total_outstanding_formatted: String,
    pub target: f64,
    pub target_formatted: String,
    pub progress_percent: f64,
    pub counts: StatusCounts,
    pub due_today: usize,
}

impl DashboardSummary {
    pub fn compute(store: &RecordStore, today: NaiveDate) -> Self {
        let total = grand_total(store.yearly());
        Self {
            total_outstanding: total,
            total_outstanding_formatted: format_inr(total, CurrencyStyle::Dashboard),
            target: TARGET_AMOUNT,
            target_formatted: format_inr(TARGET_AMOUNT, CurrencyStyle::Dashboard),
            progress_percent: progress_percent(total),
            counts: StatusCounts::from_commitments(store.commitments()),
            due_today: due_today(store.commitments(), today).len(),
        }
    }
}

/// One fiscal year with its computed total
#[derive(Debug, Clone, Serialize)]
pub struct YearlyRowSummary {
    pub year: String,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
    pub total: f64,
    pub total_formatted: String,
}

/// Year-wise outstanding breakdown with grand total
#[derive(Debug, Clone, Serialize)]
pub struct YearlySummary {
    pub rows: Vec<YearlyRowSummary>,
    pub grand_total: f64,
    pub grand_total_formatted: String,
    pub progress_percent: f64,
}

impl YearlySummary {
    pub fn compute(rows: &[YearlyOutstanding]) -> Self {
        let rows: Vec<YearlyRowSummary> = rows
            .iter()
            .map(|row| {
                let total = row_total(row);
                YearlyRowSummary {
                    year: row.year.clone(),
                    q1: parse_amount(&row.q1),
                    q2: parse_amount(&row.q2),
                    q3: parse_amount(&row.q3),
                    q4: parse_amount(&row.q4),
                    total,
                    total_formatted: format_inr(total, CurrencyStyle::YearRow),
                }
            })
            .collect();
        let grand = saturating_sum(rows.iter().map(|r| r.total));

        Self {
            rows,
            grand_total: grand,
            grand_total_formatted: format_inr(grand, CurrencyStyle::GrandTotal),
            progress_percent: progress_percent(grand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommitmentEdit;

    fn row(q1: &str, q2: &str, q3: &str, q4: &str) -> YearlyOutstanding {
        let mut r = YearlyOutstanding::new("2024-25");
        r.q1 = q1.into();
        r.q2 = q2.into();
        r.q3 = q3.into();
        r.q4 = q4.into();
        r
    }

    fn commitment(date: &str, status: Status) -> Commitment {
        let mut c = Commitment::new(format!("{}-{}", date, status));
        c.date = date.into();
        c.status = status;
        c
    }

    #[test]
    fn test_parse_amount_is_total() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-500"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount(" 2500.5 "), 2500.5);
        assert_eq!(parse_amount("1e6"), 1_000_000.0);
    }

    #[test]
    fn test_row_total_mixed_inputs() {
        let r = row("1000000", "", "500000", "abc");
        assert_eq!(row_total(&r), 1_500_000.0);
        assert_eq!(format_inr(row_total(&r), CurrencyStyle::YearRow), "₹15,00,000");

        let junk = row("-1", "x", "", "-99999999");
        let total = row_total(&junk);
        assert!(total.is_finite() && total >= 0.0);
        assert_eq!(total, 0.0);
        assert_eq!(format_inr(total, CurrencyStyle::YearRow), "-");

        let huge = row("1e308", "1e308", "1e308", "");
        assert_eq!(row_total(&huge), f64::MAX);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(progress_percent(0.0), 0.0);
        assert_eq!(progress_percent(20_000_000.0), 50.0);
        assert_eq!(progress_percent(45_000_000.0), 100.0);
        assert_eq!(progress_percent(f64::MAX), 100.0);
        assert_eq!(progress_percent(-5.0), 0.0);
    }

    #[test]
    fn test_status_counts() {
        let rows = vec![
            commitment("", Status::Pending),
            commitment("", Status::PartialPayment),
            commitment("", Status::FakeCommitment),
            commitment("", Status::Dishonored),
            commitment("", Status::Dishonored),
            commitment("", Status::NoDues),
        ];
        let counts = StatusCounts::from_commitments(&rows);
        assert_eq!(counts.total, 6);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.critical, 3);
        assert_eq!(counts.resolved, 1);
        assert_eq!(counts.by_status["DISHONORED"], 2);
        assert_eq!(counts.by_status["NO_DUES"], 1);
    }

    #[test]
    fn test_due_today_filter() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let rows = vec![
            commitment("2026-10-16", Status::PartialPayment),
            commitment("2026-10-16", Status::NoDues),
            commitment("", Status::Pending),
            commitment("2026-10-17", Status::Pending),
            commitment("2026-10-16", Status::Dishonored),
        ];

        let view = due_today(&rows, today);
        assert_eq!(view.len(), 2);
        let statuses: Vec<_> = view.iter().map(|c| c.status).collect();
        assert_eq!(statuses, vec![Status::PartialPayment, Status::Dishonored]);
    }

    #[test]
    fn test_yearly_summary_policies() {
        let mut store = RecordStore::new();
        store.update_yearly("2023-24", Quarter::Q1, "1000000");
        store.update_yearly("2023-24", Quarter::Q3, "500000");
        store.update_yearly("2023-24", Quarter::Q4, "abc");

        let summary = YearlySummary::compute(store.yearly());
        assert_eq!(summary.rows.len(), 9);
        let filled = summary.rows.iter().find(|r| r.year == "2023-24").unwrap();
        assert_eq!(filled.total, 1_500_000.0);
        assert_eq!(filled.total_formatted, "₹15,00,000");
        let empty = summary.rows.iter().find(|r| r.year == "2025-26").unwrap();
        assert_eq!(empty.total_formatted, "-");
        assert_eq!(summary.grand_total_formatted, "₹15,00,000");

        let blank = YearlySummary::compute(RecordStore::new().yearly());
        assert_eq!(blank.grand_total_formatted, "₹0");
    }

    #[test]
    fn test_dashboard_summary() {
        let mut store = RecordStore::new();
        store.update_yearly("2025-26", Quarter::Q1, "45000000");
        let id = store.add_commitment().id.clone();
        store.update_commitment(&id, CommitmentEdit::Date("2026-10-16".into()));
        let other = store.add_commitment().id.clone();
        store.update_commitment(&other, CommitmentEdit::Status(Status::NoDues));

        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let summary = DashboardSummary::compute(&store, today);
        assert_eq!(summary.total_outstanding, 45_000_000.0);
        assert_eq!(summary.progress_percent, 100.0);
        assert_eq!(summary.total_outstanding_formatted, "₹4.5 Cr");
        assert_eq!(summary.target_formatted, "₹4 Cr");
        assert_eq!(summary.counts.active, 1);
        assert_eq!(summary.counts.resolved, 1);
        assert_eq!(summary.due_today, 1);
    }
}

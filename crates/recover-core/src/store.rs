//! In-memory record store
//!
//! Holds the commitment ledger (most-recent-first) and the fixed set of
//! fiscal-year outstanding rows. Mutations are plain overwrites: no
//! validation, no derived fields. Edits aimed at an id that no longer exists
//! are silently ignored; the returned `bool` only says whether anything
//! changed.

use tracing::debug;
use uuid::Uuid;

use crate::models::{
    ClassificationResult, Commitment, CommitmentEdit, Quarter, YearlyOutstanding, INITIAL_YEARS,
};

#[derive(Debug, Clone)]
pub struct RecordStore {
    commitments: Vec<Commitment>,
    yearly: Vec<YearlyOutstanding>,
}

impl RecordStore {
    /// Empty ledger plus one blank row per fiscal year
    pub fn new() -> Self {
        Self {
            commitments: Vec::new(),
            yearly: INITIAL_YEARS
                .iter()
                .map(|y| YearlyOutstanding::new(y))
                .collect(),
        }
    }

    pub fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    pub fn commitment(&self, id: &str) -> Option<&Commitment> {
        self.commitments.iter().find(|c| c.id == id)
    }

    pub fn yearly(&self) -> &[YearlyOutstanding] {
        &self.yearly
    }

    /// Insert a blank `PENDING` commitment at the head of the ledger
    pub fn add_commitment(&mut self) -> &Commitment {
        let commitment = Commitment::new(Uuid::new_v4().to_string());
        debug!(id = %commitment.id, "Added commitment");
        self.commitments.insert(0, commitment);
        &self.commitments[0]
    }

    /// Replace one field of a commitment
    pub fn update_commitment(&mut self, id: &str, edit: CommitmentEdit) -> bool {
        match self.commitments.iter_mut().find(|c| c.id == id) {
            Some(commitment) => {
                debug!(id, field = edit.field_name(), "Updated commitment");
                edit.apply(commitment);
                true
            }
            None => {
                debug!(id, "Ignoring update for missing commitment");
                false
            }
        }
    }

    pub fn delete_commitment(&mut self, id: &str) -> bool {
        let before = self.commitments.len();
        self.commitments.retain(|c| c.id != id);
        let removed = self.commitments.len() != before;
        if removed {
            debug!(id, "Deleted commitment");
        }
        removed
    }

    /// Replace one quarter of a fiscal-year row
    pub fn update_yearly(&mut self, id: &str, quarter: Quarter, value: impl Into<String>) -> bool {
        match self.yearly.iter_mut().find(|y| y.id == id) {
            Some(row) => {
                *row.quarter_mut(quarter) = value.into();
                debug!(year = id, quarter = %quarter, "Updated yearly outstanding");
                true
            }
            None => {
                debug!(year = id, "Ignoring update for unknown fiscal year");
                false
            }
        }
    }

    /// Merge a classification into a commitment
    ///
    /// Status is always overwritten. Date and amount are only overwritten when
    /// the result carries a usable value; an absent value never clears one.
    pub fn apply_classification(&mut self, id: &str, result: &ClassificationResult) -> bool {
        let Some(commitment) = self.commitments.iter_mut().find(|c| c.id == id) else {
            debug!(id, "Discarding classification for missing commitment");
            return false;
        };

        commitment.status = result.suggested_status;
        if let Some(date) = result.extracted_date.as_deref().filter(|d| !d.trim().is_empty()) {
            commitment.date = date.trim().to_string();
        }
        if let Some(amount) = result
            .extracted_amount
            .filter(|a| a.is_finite() && *a > 0.0)
        {
            commitment.amount = amount.to_string();
        }

        debug!(id, status = %commitment.status, "Applied classification");
        true
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

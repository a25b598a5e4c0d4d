//! RecoverPro Core Library
//!
//! Shared functionality for the RecoverPro debt recovery tracker:
//! - Commitment ledger and fiscal-year outstanding records
//! - Transcript classifier with Gemini, fallback and mock backends
//! - Dashboard aggregation and INR formatting
//! - Tracker state shared by the CLI and the HTTP server

pub mod aggregation;
pub mod ai;
pub mod error;
pub mod format;
pub mod models;
pub mod prompts;
pub mod store;
pub mod tracker;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregation::{
    due_today, progress_percent, today_local, DashboardSummary, PriorityView, StatusCounts,
    YearlySummary, TARGET_AMOUNT,
};
pub use ai::{
    ClassifierBackend, ClassifierClient, ClassifierInfo, FallbackBackend, GeminiBackend,
    MockBackend,
};
pub use error::{Error, Result};
pub use format::{format_inr, CurrencyStyle};
pub use models::{
    ClassificationResult, Commitment, CommitmentEdit, Quarter, Status, StatusGroup,
    YearlyOutstanding,
};
pub use prompts::{Prompt, PromptId};
pub use store::RecordStore;
pub use tracker::{ClassifyOutcome, Tracker};

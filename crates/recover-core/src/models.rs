//! Domain models for RecoverPro

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Fiscal years tracked in the outstanding-dues table, newest first
pub const INITIAL_YEARS: [&str; 9] = [
    "2025-26", "2024-25", "2023-24", "2022-23", "2021-22", "2020-21", "2019-20", "2018-19",
    "2017-18",
];

/// Outcome classification of a commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Default: valid promise with no negative signs yet, or not enough to go on
    #[default]
    Pending,
    /// Excuses that seem untrue, or refusal despite a prior promise
    FakeCommitment,
    /// A promised date was missed, or a payment instrument bounced
    Dishonored,
    /// Part of the debt paid or promised ("patch-up")
    PartialPayment,
    /// Debt fully cleared
    NoDues,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::FakeCommitment => "FAKE_COMMITMENT",
            Self::Dishonored => "DISHONORED",
            Self::PartialPayment => "PARTIAL_PAYMENT",
            Self::NoDues => "NO_DUES",
        }
    }

    /// Human-readable label used by ledger views
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Review",
            Self::FakeCommitment => "Fake Commitment",
            Self::Dishonored => "Dishonored/Missed",
            Self::PartialPayment => "Partial Payment",
            Self::NoDues => "No Dues (Cleared)",
        }
    }

    pub fn all() -> &'static [Status] {
        &[
            Self::Pending,
            Self::FakeCommitment,
            Self::Dishonored,
            Self::PartialPayment,
            Self::NoDues,
        ]
    }

    pub fn group(&self) -> StatusGroup {
        match self {
            Self::Pending | Self::PartialPayment => StatusGroup::Active,
            Self::FakeCommitment | Self::Dishonored => StatusGroup::Critical,
            Self::NoDues => StatusGroup::Resolved,
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "PENDING" => Ok(Self::Pending),
            "FAKE_COMMITMENT" | "FAKE" => Ok(Self::FakeCommitment),
            "DISHONORED" | "DISHONOURED" => Ok(Self::Dishonored),
            "PARTIAL_PAYMENT" | "PARTIAL" => Ok(Self::PartialPayment),
            "NO_DUES" | "CLEARED" => Ok(Self::NoDues),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dashboard partition of statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusGroup {
    /// PENDING and PARTIAL_PAYMENT
    Active,
    /// FAKE_COMMITMENT and DISHONORED
    Critical,
    /// NO_DUES
    Resolved,
}

/// One tracked debtor interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub id: String,
    pub person_name: String,
    pub contact_no: String,
    /// Problem summary, branch or debtor profile
    pub branch_or_profile: String,
    /// Raw call transcript or note
    pub transcript: String,
    /// Promised or next-action date (`YYYY-MM-DD`), empty when unset
    pub date: String,
    /// Kept as text so an empty or half-typed value survives editing
    pub amount: String,
    pub status: Status,
}

impl Commitment {
    /// Create an empty `PENDING` commitment with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            person_name: String::new(),
            contact_no: String::new(),
            branch_or_profile: String::new(),
            transcript: String::new(),
            date: String::new(),
            amount: String::new(),
            status: Status::Pending,
        }
    }

    /// Whether the transcript has anything worth classifying
    pub fn has_transcript(&self) -> bool {
        !self.transcript.trim().is_empty()
    }
}

/// A single-field edit to a commitment
#[derive(Debug, Clone, PartialEq)]
pub enum CommitmentEdit {
    PersonName(String),
    ContactNo(String),
    BranchOrProfile(String),
    Transcript(String),
    Date(String),
    Amount(String),
    Status(Status),
}

impl CommitmentEdit {
    /// Build an edit from a field name (camelCase or snake_case) and raw value
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let value_owned = value.to_string();
        match field {
            "personName" | "person_name" => Ok(Self::PersonName(value_owned)),
            "contactNo" | "contact_no" => Ok(Self::ContactNo(value_owned)),
            "branchOrProfile" | "branch_or_profile" => Ok(Self::BranchOrProfile(value_owned)),
            "transcript" => Ok(Self::Transcript(value_owned)),
            "date" => Ok(Self::Date(value_owned)),
            "amount" => Ok(Self::Amount(value_owned)),
            "status" => value
                .parse::<Status>()
                .map(Self::Status)
                .map_err(Error::InvalidData),
            _ => Err(Error::InvalidData(format!(
                "Unknown commitment field: {}",
                field
            ))),
        }
    }

    /// Field name as exposed on the wire
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::PersonName(_) => "personName",
            Self::ContactNo(_) => "contactNo",
            Self::BranchOrProfile(_) => "branchOrProfile",
            Self::Transcript(_) => "transcript",
            Self::Date(_) => "date",
            Self::Amount(_) => "amount",
            Self::Status(_) => "status",
        }
    }

    pub(crate) fn apply(self, commitment: &mut Commitment) {
        match self {
            Self::PersonName(v) => commitment.person_name = v,
            Self::ContactNo(v) => commitment.contact_no = v,
            Self::BranchOrProfile(v) => commitment.branch_or_profile = v,
            Self::Transcript(v) => commitment.transcript = v,
            Self::Date(v) => commitment.date = v,
            Self::Amount(v) => commitment.amount = v,
            Self::Status(s) => commitment.status = s,
        }
    }
}

/// Fiscal quarter of a yearly outstanding row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q1 => "q1",
            Self::Q2 => "q2",
            Self::Q3 => "q3",
            Self::Q4 => "q4",
        }
    }

    /// Months covered, Indian fiscal calendar
    pub fn period(&self) -> &'static str {
        match self {
            Self::Q1 => "Apr-Jun",
            Self::Q2 => "Jul-Sep",
            Self::Q3 => "Oct-Dec",
            Self::Q4 => "Jan-Mar",
        }
    }

    pub fn all() -> &'static [Quarter] {
        &[Self::Q1, Self::Q2, Self::Q3, Self::Q4]
    }
}

impl std::str::FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "q1" | "1" => Ok(Self::Q1),
            "q2" | "2" => Ok(Self::Q2),
            "q3" | "3" => Ok(Self::Q3),
            "q4" | "4" => Ok(Self::Q4),
            _ => Err(format!("Unknown quarter: {}", s)),
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quarterly outstanding-dues snapshot for one fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyOutstanding {
    /// Same as `year`
    pub id: String,
    /// Fiscal year label, e.g. "2024-25"
    pub year: String,
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub q4: String,
}

impl YearlyOutstanding {
    pub fn new(year: &str) -> Self {
        Self {
            id: year.to_string(),
            year: year.to_string(),
            q1: String::new(),
            q2: String::new(),
            q3: String::new(),
            q4: String::new(),
        }
    }

    pub fn quarter(&self, quarter: Quarter) -> &str {
        match quarter {
            Quarter::Q1 => &self.q1,
            Quarter::Q2 => &self.q2,
            Quarter::Q3 => &self.q3,
            Quarter::Q4 => &self.q4,
        }
    }

    pub(crate) fn quarter_mut(&mut self, quarter: Quarter) -> &mut String {
        match quarter {
            Quarter::Q1 => &mut self.q1,
            Quarter::Q2 => &mut self.q2,
            Quarter::Q3 => &mut self.q3,
            Quarter::Q4 => &mut self.q4,
        }
    }
}

/// Reasoning attached when no classifier credential is configured
pub const REASON_NOT_CONFIGURED: &str = "API Key missing. Please check configuration.";

/// Reasoning attached when the remote classifier call fails
pub const REASON_ANALYSIS_FAILED: &str = "Failed to analyze transcript.";

/// Reasoning attached when there was nothing to classify
pub const REASON_EMPTY_TRANSCRIPT: &str = "Transcript is empty.";

/// Result of classifying a transcript
///
/// Consumed immediately to patch a commitment; the reasoning is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub suggested_status: Status,
    #[serde(default)]
    pub extracted_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub extracted_amount: Option<f64>,
    pub reasoning: String,
}

impl ClassificationResult {
    fn pending(reasoning: &str) -> Self {
        Self {
            suggested_status: Status::Pending,
            extracted_date: None,
            extracted_amount: None,
            reasoning: reasoning.to_string(),
        }
    }

    /// Fallback result when no backend credential is configured
    pub fn not_configured() -> Self {
        Self::pending(REASON_NOT_CONFIGURED)
    }

    /// Fallback result when the backend call or its reply failed
    pub fn analysis_failed() -> Self {
        Self::pending(REASON_ANALYSIS_FAILED)
    }

    /// Result for a blank transcript (nothing was sent anywhere)
    pub fn empty_transcript() -> Self {
        Self::pending(REASON_EMPTY_TRANSCRIPT)
    }

    /// Drop extracted values that cannot be merged into a commitment
    ///
    /// Dates must be `YYYY-MM-DD`; amounts must be finite and non-negative.
    pub fn sanitized(mut self) -> Self {
        self.extracted_date = self.extracted_date.and_then(|d| {
            let d = d.trim();
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .ok()
                .map(|_| d.to_string())
        });
        self.extracted_amount = self
            .extracted_amount
            .filter(|a| a.is_finite() && *a >= 0.0);
        self.reasoning = self.reasoning.trim().to_string();
        self
    }
}

/// Accept `extractedAmount` as a number, a numeric string, or null
fn deserialize_optional_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in Status::all() {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), *status);
        }
        assert_eq!("partial-payment".parse::<Status>(), Ok(Status::PartialPayment));
        assert!("SETTLED".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&Status::FakeCommitment).unwrap();
        assert_eq!(json, "\"FAKE_COMMITMENT\"");
    }

    #[test]
    fn test_status_groups() {
        assert_eq!(Status::Pending.group(), StatusGroup::Active);
        assert_eq!(Status::PartialPayment.group(), StatusGroup::Active);
        assert_eq!(Status::FakeCommitment.group(), StatusGroup::Critical);
        assert_eq!(Status::Dishonored.group(), StatusGroup::Critical);
        assert_eq!(Status::NoDues.group(), StatusGroup::Resolved);
    }

    #[test]
    fn test_commitment_wire_shape() {
        let c = Commitment::new("abc");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["personName"], "");
        assert_eq!(json["branchOrProfile"], "");
        assert_eq!(json["status"], "PENDING");
    }

    #[test]
    fn test_commitment_edit_parse() {
        assert_eq!(
            CommitmentEdit::parse("personName", "Ravi").unwrap(),
            CommitmentEdit::PersonName("Ravi".into())
        );
        assert_eq!(
            CommitmentEdit::parse("status", "NO_DUES").unwrap(),
            CommitmentEdit::Status(Status::NoDues)
        );
        assert!(matches!(
            CommitmentEdit::parse("status", "maybe"),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            CommitmentEdit::parse("id", "x"),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_quarter_parse() {
        assert_eq!("Q3".parse::<Quarter>(), Ok(Quarter::Q3));
        assert_eq!("4".parse::<Quarter>(), Ok(Quarter::Q4));
        assert!("q5".parse::<Quarter>().is_err());
    }

    #[test]
    fn test_classification_result_accepts_string_amount() {
        let json = r#"{"suggestedStatus":"PARTIAL_PAYMENT","extractedDate":null,"extractedAmount":"25,000","reasoning":"paid half"}"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.suggested_status, Status::PartialPayment);
        assert_eq!(result.extracted_amount, Some(25000.0));
        assert_eq!(result.extracted_date, None);
    }

    #[test]
    fn test_sanitized_drops_bad_values() {
        let result = ClassificationResult {
            suggested_status: Status::Dishonored,
            extracted_date: Some("next Monday".into()),
            extracted_amount: Some(-10.0),
            reasoning: "  cheque bounced ".into(),
        }
        .sanitized();
        assert_eq!(result.extracted_date, None);
        assert_eq!(result.extracted_amount, None);
        assert_eq!(result.reasoning, "cheque bounced");

        let ok = ClassificationResult {
            suggested_status: Status::Pending,
            extracted_date: Some("2026-11-02".into()),
            extracted_amount: Some(5000.0),
            reasoning: String::new(),
        }
        .sanitized();
        assert_eq!(ok.extracted_date.as_deref(), Some("2026-11-02"));
        assert_eq!(ok.extracted_amount, Some(5000.0));
    }

    #[test]
    fn test_fallback_results() {
        let nc = ClassificationResult::not_configured();
        let failed = ClassificationResult::analysis_failed();
        assert_eq!(nc.suggested_status, Status::Pending);
        assert_eq!(failed.suggested_status, Status::Pending);
        assert_ne!(nc.reasoning, failed.reasoning);
        assert!(nc.extracted_date.is_none() && nc.extracted_amount.is_none());
    }
}

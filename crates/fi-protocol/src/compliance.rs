use serde::{Deserialize, Serialize};

use crate::inspection::ParsedInspection;

/// Outcome of a single compliance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

/// One evaluated rule outcome, ready for a report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    /// Short label, e.g. "Riser 1 Control Valve".
    pub requirement: String,
    pub status: CheckStatus,
    /// Human-readable explanation including the measured value where relevant.
    pub message: String,
    /// NFPA 25 section citation.
    pub nfpa_reference: String,
}

impl ComplianceCheck {
    pub fn new(
        requirement: impl Into<String>,
        status: CheckStatus,
        message: impl Into<String>,
        nfpa_reference: impl Into<String>,
    ) -> Self {
        Self {
            requirement: requirement.into(),
            status,
            message: message.into(),
            nfpa_reference: nfpa_reference.into(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }
}

/// How urgently the inspector should answer a follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPriority {
    Critical,
    Recommended,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub question: String,
    pub priority: QuestionPriority,
    /// Why the question is being asked.
    pub context: String,
}

/// Single verdict for one evaluated transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Compliant,
    NonCompliant,
    RequiresAttention,
}

/// Which parser produced the readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTier {
    /// External language model.
    Model,
    /// Deterministic pattern extraction.
    Patterns,
}

/// Aggregate result of processing one transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub transcription: String,
    pub parsed: ParsedInspection,
    pub compliance_checks: Vec<ComplianceCheck>,
    pub follow_up_questions: Vec<FollowUpQuestion>,
    pub missing_fields: Vec<String>,
    pub overall_status: OverallStatus,
    pub parse_tier: ParseTier,
}

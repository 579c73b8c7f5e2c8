//! Conversation agent: one transcript in, one evaluated response out.
//!
//! Steps per call:
//! 1. Parse readings (model tier if configured, patterns otherwise).
//! 2. Run the NFPA rule engine.
//! 3. Flag missing critical fields per riser.
//! 4. Derive follow-up questions.
//! 5. Compute the overall verdict.
//!
//! The agent keeps no state between calls apart from its parser.

use std::fmt;

use chrono::Utc;
use uuid::Uuid;

use fi_protocol::{
    AgentResponse, CheckStatus, ComplianceCheck, ControlValveStatus, Corrosion, FieldKind,
    FollowUpQuestion, Inspection, InspectionStatus, OverallStatus, ParsedInspection,
    QuestionPriority, RiserReading,
};

use crate::inference::{
    OllamaConfig, OllamaParser, ParseResult, PatternParser, ReadingParser, TieredParser,
};

/// Message used when a transcript yielded no risers at all.
pub const NO_RISER_DATA: &str = "No riser inspection data found";

/// A critical field the inspector has not stated for a riser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField {
    pub riser_number: u32,
    pub field: FieldKind,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.riser_number;
        match self.field {
            FieldKind::StaticPressure => write!(f, "Riser {n}: Missing static pressure reading"),
            FieldKind::ControlValve => write!(f, "Riser {n}: Control valve status unclear"),
            FieldKind::ButterflyValve => write!(f, "Riser {n}: Butterfly valve status unclear"),
            FieldKind::Corrosion => write!(f, "Riser {n}: Corrosion assessment missing"),
        }
    }
}

/// Stateless orchestrator over a reading parser and the rule engine.
pub struct ConversationAgent {
    parser: Box<dyn ReadingParser>,
}

impl ConversationAgent {
    pub fn new(parser: Box<dyn ReadingParser>) -> Self {
        Self { parser }
    }

    /// Agent that only uses deterministic pattern extraction.
    pub fn pattern_only() -> Self {
        Self::new(Box::new(PatternParser::new()))
    }

    /// Build from config: model tier with pattern fallback when enabled.
    pub fn from_config(config: &OllamaConfig) -> Self {
        if config.enabled {
            tracing::info!(
                host = %config.host,
                model = %config.model,
                "model parsing enabled"
            );
            Self::new(Box::new(TieredParser::new(
                Box::new(OllamaParser::new(config.clone())),
                Box::new(PatternParser::new()),
            )))
        } else {
            tracing::info!("model parsing disabled, using patterns only");
            Self::pattern_only()
        }
    }

    /// Process one transcription into an evaluated response.
    ///
    /// Never fails: if the configured parser yields nothing, pattern
    /// extraction is used. `prior` is accepted for context only.
    pub async fn process(&self, transcription: &str, prior: Option<&Inspection>) -> AgentResponse {
        if let Some(prior) = prior {
            tracing::debug!(prior_id = %prior.id, risers = prior.risers.len(), "prior inspection supplied");
        }

        let ParseResult { readings, tier } = match self.parser.parse(transcription).await {
            Some(result) => result,
            None => {
                tracing::warn!(
                    parser = self.parser.tier_name(),
                    "parser returned nothing, using pattern extraction"
                );
                PatternParser::new().parse_now(transcription)
            }
        };

        let compliance_checks = fi_compliance::evaluate(&readings);
        let missing_fields: Vec<String> = if readings.is_empty() {
            vec![NO_RISER_DATA.to_string()]
        } else {
            find_missing(&readings).iter().map(ToString::to_string).collect()
        };
        let follow_up_questions = follow_up_questions(&readings, &compliance_checks);
        let overall_status = overall_status(&compliance_checks, &missing_fields);

        tracing::info!(
            tier = ?tier,
            risers = readings.len(),
            checks = compliance_checks.len(),
            missing = missing_fields.len(),
            questions = follow_up_questions.len(),
            status = ?overall_status,
            "transcription processed"
        );

        AgentResponse {
            transcription: transcription.to_string(),
            parsed: ParsedInspection {
                risers: readings,
                notes: transcription.to_string(),
            },
            compliance_checks,
            follow_up_questions,
            missing_fields,
            overall_status,
            parse_tier: tier,
        }
    }

    /// Turn an evaluated response into a persistable inspection record.
    pub fn create_inspection(
        response: &AgentResponse,
        technician: impl Into<String>,
        location: impl Into<String>,
    ) -> Inspection {
        Inspection {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            location: location.into(),
            technician: technician.into(),
            risers: response.parsed.risers.clone(),
            notes: response.parsed.notes.clone(),
            status: InspectionStatus::Completed,
        }
    }
}

/// Critical fields left unstated, riser by riser.
pub fn find_missing(readings: &[RiserReading]) -> Vec<MissingField> {
    let mut missing = Vec::new();
    for riser in readings {
        let n = riser.riser_number;
        if riser.stated_static().is_none() {
            missing.push(MissingField {
                riser_number: n,
                field: FieldKind::StaticPressure,
            });
        }
        if riser.control_valve_status == ControlValveStatus::Unknown {
            missing.push(MissingField {
                riser_number: n,
                field: FieldKind::ControlValve,
            });
        }
        if riser.corrosion == Corrosion::Unknown {
            missing.push(MissingField {
                riser_number: n,
                field: FieldKind::Corrosion,
            });
        }
    }
    missing
}

/// Fixed two-rule heuristic: flow test prompt, then failure follow-up.
pub fn follow_up_questions(
    readings: &[RiserReading],
    checks: &[ComplianceCheck],
) -> Vec<FollowUpQuestion> {
    let mut questions = Vec::new();

    let has_static = readings.iter().any(|r| r.stated_static().is_some());
    let has_residual = readings.iter().any(|r| r.stated_residual().is_some());
    if has_static && !has_residual {
        questions.push(FollowUpQuestion {
            question: "I noticed static pressure readings but no residual pressure. \
                       Did you perform a flow test?"
                .into(),
            priority: QuestionPriority::Critical,
            context: "NFPA 25 requires residual pressure testing during annual inspections"
                .into(),
        });
    }

    let failed = checks.iter().filter(|c| c.is_fail()).count();
    if failed > 0 {
        questions.push(FollowUpQuestion {
            question: format!(
                "I found {failed} compliance issues that need immediate attention. \
                 Should I document these for follow-up maintenance?"
            ),
            priority: QuestionPriority::Critical,
            context: "Failed compliance items require immediate corrective action".into(),
        });
    }

    questions
}

/// Missing fields or any failure → non-compliant; else any warning →
/// requires attention; else compliant.
pub fn overall_status(checks: &[ComplianceCheck], missing_fields: &[String]) -> OverallStatus {
    if !missing_fields.is_empty() || checks.iter().any(|c| c.status == CheckStatus::Fail) {
        OverallStatus::NonCompliant
    } else if checks.iter().any(|c| c.status == CheckStatus::Warning) {
        OverallStatus::RequiresAttention
    } else {
        OverallStatus::Compliant
    }
}

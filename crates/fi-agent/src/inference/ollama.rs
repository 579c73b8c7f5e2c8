//! Ollama model tier: asks a local chat model for structured riser data.
//!
//! Calls the Ollama HTTP API (`/api/chat`) with a fixed system prompt and
//! the transcript as the user message. The first JSON object in the reply
//! is validated against a strict schema before it becomes readings. Any
//! failure (unreachable, timeout, non-200, malformed or invalid JSON) makes
//! this tier return None so the caller can fall back to patterns.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use fi_protocol::{
    ButterflyValveStatus, ControlValveStatus, Corrosion, GaugeKind, GaugeReading, ParseTier,
    RiserReading,
};

use super::{ParseResult, ReadingParser, json};

const SYSTEM_PROMPT: &str = r#"You are an expert NFPA fire safety inspection assistant. Parse fire safety inspection transcriptions and extract structured data.

Extract the following for every riser mentioned:
- riserNumber: The riser number mentioned (integer, 1 or greater)
- staticPressure: Static pressure in PSI (number, or null if not stated)
- residualPressure: Residual pressure in PSI (number, or null if not stated)
- controlValveStatus: "open", "closed", "partially_open", or "unknown"
- butterflyValveStatus: "detected_clear", "detected_obstructed", or "not_detected"
- corrosion: "none", "minor", "moderate", "severe", or "unknown"

Use "unknown" when the inspector did not state a value. Do not guess.

Respond with ONLY a JSON object (no markdown, no explanation):
{"risers": [{"riserNumber": 1, "staticPressure": 55, "residualPressure": 45, "controlValveStatus": "open", "butterflyValveStatus": "detected_clear", "corrosion": "none"}]}

If no riser is mentioned, respond with:
{"risers": []}"#;

/// Configuration for the local Ollama inference endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to use for inference.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether model parsing is attempted at all.
    #[serde(default)]
    pub enabled: bool,
    /// Bearer token for hosted Ollama-compatible endpoints.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.1:8b".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            enabled: false,
            api_key: None,
        }
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    format: &'a str,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Raw model output before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInspection {
    risers: Vec<ModelRiser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelRiser {
    riser_number: u32,
    #[serde(default)]
    static_pressure: Option<f64>,
    #[serde(default)]
    residual_pressure: Option<f64>,
    #[serde(default)]
    control_valve_status: Option<ControlValveStatus>,
    #[serde(default)]
    butterfly_valve_status: Option<ButterflyValveStatus>,
    #[serde(default)]
    corrosion: Option<Corrosion>,
}

/// Why a model answer was not usable.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("non-success status {0}")]
    Status(reqwest::StatusCode),

    #[error("reply had no message content")]
    EmptyReply,

    #[error("reply contained no JSON object")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema violation: {0}")]
    Schema(String),
}

/// Parser tier backed by an Ollama chat model.
pub struct OllamaParser {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaParser {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Ask the model and validate its answer.
    pub async fn request(&self, transcript: &str) -> Result<Vec<RiserReading>, ModelError> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let user = format!("Parse this inspection transcription: \"{transcript}\"");

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            format: "json",
            stream: false,
        };

        let mut request = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ModelError::Status(response.status()));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat.message.ok_or(ModelError::EmptyReply)?.content;
        let object = json::first_object(&content).ok_or(ModelError::NoJsonObject)?;
        let raw: ModelInspection = serde_json::from_str(object)?;

        validate(raw)
    }
}

/// Check the model's answer and convert it to readings.
fn validate(raw: ModelInspection) -> Result<Vec<RiserReading>, ModelError> {
    let now = Utc::now();
    raw.risers
        .into_iter()
        .map(|r| {
            if r.riser_number == 0 {
                return Err(ModelError::Schema("riserNumber must be at least 1".into()));
            }
            for psi in [r.static_pressure, r.residual_pressure].into_iter().flatten() {
                if !psi.is_finite() || psi < 0.0 {
                    return Err(ModelError::Schema(format!(
                        "riser {}: pressure {psi} out of range",
                        r.riser_number
                    )));
                }
            }

            let mut reading = RiserReading {
                static_pressure: r.static_pressure,
                residual_pressure: r.residual_pressure,
                control_valve_status: r.control_valve_status.unwrap_or_default(),
                butterfly_valve_status: r.butterfly_valve_status.unwrap_or_default(),
                corrosion: r.corrosion.unwrap_or_default(),
                ..RiserReading::new(r.riser_number)
            };
            if let Some(psi) = reading.stated_static() {
                reading
                    .gauge_readings
                    .push(GaugeReading::psi(GaugeKind::Static, psi, now));
            }
            if let Some(psi) = reading.stated_residual() {
                reading
                    .gauge_readings
                    .push(GaugeReading::psi(GaugeKind::Residual, psi, now));
            }
            Ok(reading)
        })
        .collect()
}

#[async_trait]
impl ReadingParser for OllamaParser {
    async fn parse(&self, transcript: &str) -> Option<ParseResult> {
        match self.request(transcript).await {
            Ok(readings) => {
                tracing::info!(
                    model = %self.config.model,
                    risers = readings.len(),
                    "model parsed transcript"
                );
                Some(ParseResult {
                    readings,
                    tier: ParseTier::Model,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, model = %self.config.model, "model parse unavailable");
                None
            }
        }
    }

    fn tier_name(&self) -> &str {
        "ollama"
    }
}

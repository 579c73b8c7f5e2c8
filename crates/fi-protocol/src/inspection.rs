use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One riser's state for one inspection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiserReading {
    /// Riser number as spoken by the inspector (1-based).
    pub riser_number: u32,
    /// Static pressure in PSI. `None` (or zero) means "not stated".
    #[serde(default)]
    pub static_pressure: Option<f64>,
    /// Residual pressure in PSI. `None` (or zero) means "not stated".
    #[serde(default)]
    pub residual_pressure: Option<f64>,
    #[serde(default)]
    pub control_valve_status: ControlValveStatus,
    #[serde(default)]
    pub butterfly_valve_status: ButterflyValveStatus,
    #[serde(default)]
    pub corrosion: Corrosion,
    /// Gauge readings, appended only when a numeric value was matched.
    #[serde(default)]
    pub gauge_readings: Vec<GaugeReading>,
}

impl RiserReading {
    /// A reading with nothing stated beyond the riser number.
    pub fn new(riser_number: u32) -> Self {
        Self {
            riser_number,
            static_pressure: None,
            residual_pressure: None,
            control_valve_status: ControlValveStatus::Unknown,
            butterfly_valve_status: ButterflyValveStatus::NotDetected,
            corrosion: Corrosion::Unknown,
            gauge_readings: Vec::new(),
        }
    }

    /// Static pressure if stated. Zero is treated as "not stated".
    pub fn stated_static(&self) -> Option<f64> {
        self.static_pressure.filter(|p| *p != 0.0)
    }

    /// Residual pressure if stated. Zero is treated as "not stated".
    pub fn stated_residual(&self) -> Option<f64> {
        self.residual_pressure.filter(|p| *p != 0.0)
    }
}

/// Position of the riser control valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlValveStatus {
    Open,
    Closed,
    PartiallyOpen,
    /// Not stated in the transcript.
    #[default]
    Unknown,
}

impl ControlValveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::PartiallyOpen => "partially_open",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ControlValveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Butterfly valve observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButterflyValveStatus {
    DetectedClear,
    DetectedObstructed,
    #[default]
    NotDetected,
}

/// Corrosion level observed on the riser fittings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Corrosion {
    None,
    Minor,
    Moderate,
    Severe,
    #[default]
    Unknown,
}

/// Which pressure a gauge reading was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeKind {
    Static,
    Residual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    #[default]
    Psi,
}

/// A single timestamped gauge value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeReading {
    #[serde(rename = "type")]
    pub kind: GaugeKind,
    pub pressure: f64,
    #[serde(default)]
    pub unit: PressureUnit,
    pub timestamp: DateTime<Utc>,
}

impl GaugeReading {
    pub fn psi(kind: GaugeKind, pressure: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            pressure,
            unit: PressureUnit::Psi,
            timestamp,
        }
    }
}

/// Readings parsed from one transcript, plus the transcript as notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInspection {
    pub risers: Vec<RiserReading>,
    pub notes: String,
}

/// Lifecycle status of an inspection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    InProgress,
    Completed,
}

/// A persistable inspection record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    /// Unique inspection ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub technician: String,
    pub risers: Vec<RiserReading>,
    pub notes: String,
    pub status: InspectionStatus,
}

/// Inspection fields the agent can prompt the inspector for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    StaticPressure,
    ControlValve,
    ButterflyValve,
    Corrosion,
}

impl FieldKind {
    /// Prompt spoken back to the inspector when this field was not heard.
    pub fn interruption_message(&self) -> &'static str {
        match self {
            Self::StaticPressure => {
                "I didn't hear the static pressure reading. Could you provide the PSI reading?"
            }
            Self::ControlValve => {
                "I didn't hear the control valve status. Is the valve open or closed?"
            }
            Self::ButterflyValve => {
                "I didn't hear about the butterfly valve. Is it detected and clear?"
            }
            Self::Corrosion => {
                "I didn't hear about corrosion. Did you notice any corrosion on the fittings?"
            }
        }
    }
}

/// Prompt used when no field-specific message applies.
pub const GENERIC_INTERRUPTION: &str =
    "I need a bit more information. Could you provide the missing details?";

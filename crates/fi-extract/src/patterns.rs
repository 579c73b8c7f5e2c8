//! Keyword and number patterns recognised in inspection transcripts.
//!
//! Every pattern is case-insensitive and scans the whole transcript, not
//! just the sentence around a riser mention.

use regex::Regex;
use std::sync::LazyLock;

use fi_protocol::{ButterflyValveStatus, ControlValveStatus, Corrosion};

static RISER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)riser\s*(\d+)").unwrap());

static STATIC_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)static\s*pressure\s*(?:is\s*)?(\d+(?:\.\d+)?)\s*psi").unwrap()
});

static RESIDUAL_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)residual\s*pressure\s*(?:is\s*)?(\d+(?:\.\d+)?)\s*psi").unwrap()
});

static VALVE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)control\s*valve\s*open").unwrap());
static VALVE_CLOSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)control\s*valve\s*closed").unwrap());
static VALVE_PARTIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)control\s*valve\s*partially").unwrap());

static BUTTERFLY_DETECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)butterfly\s*valve\s*detected").unwrap());
// "obstructed" said about the butterfly valve within the same sentence.
static BUTTERFLY_OBSTRUCTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)butterfly\s*valve[^.]*?\bobstructed").unwrap());

// Checked in order; the first hit wins.
static CORROSION_LEVELS: LazyLock<Vec<(Corrosion, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Corrosion::None,
            Regex::new(r"(?i)(\bno\s*corrosion|corrosion\s*free)").unwrap(),
        ),
        (
            Corrosion::Minor,
            Regex::new(r"(?i)(minor|slight)\s*corrosion").unwrap(),
        ),
        (
            Corrosion::Moderate,
            Regex::new(r"(?i)moderate\s*corrosion").unwrap(),
        ),
        (
            Corrosion::Severe,
            Regex::new(r"(?i)(severe|heavy)\s*corrosion").unwrap(),
        ),
    ]
});

/// Every riser number mentioned, in order of appearance.
///
/// Zero and numbers that do not fit in a `u32` are skipped.
pub fn riser_mentions(text: &str) -> Vec<u32> {
    RISER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
        .collect()
}

/// First static pressure value stated anywhere in the text.
pub fn static_pressure(text: &str) -> Option<f64> {
    first_number(&STATIC_PRESSURE, text)
}

/// First residual pressure value stated anywhere in the text.
pub fn residual_pressure(text: &str) -> Option<f64> {
    first_number(&RESIDUAL_PRESSURE, text)
}

pub fn control_valve(text: &str) -> ControlValveStatus {
    if VALVE_OPEN.is_match(text) {
        ControlValveStatus::Open
    } else if VALVE_CLOSED.is_match(text) {
        ControlValveStatus::Closed
    } else if VALVE_PARTIAL.is_match(text) {
        ControlValveStatus::PartiallyOpen
    } else {
        ControlValveStatus::Unknown
    }
}

pub fn butterfly_valve(text: &str) -> ButterflyValveStatus {
    if !BUTTERFLY_DETECTED.is_match(text) {
        ButterflyValveStatus::NotDetected
    } else if BUTTERFLY_OBSTRUCTED.is_match(text) {
        ButterflyValveStatus::DetectedObstructed
    } else {
        ButterflyValveStatus::DetectedClear
    }
}

pub fn corrosion(text: &str) -> Corrosion {
    CORROSION_LEVELS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .unwrap_or(Corrosion::Unknown)
}

fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text).and_then(|caps| caps[1].parse::<f64>().ok())
}

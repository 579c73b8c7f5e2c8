//! Live-capture interruption heuristic.
//!
//! While the inspector is still talking, decide whether a partial
//! transcription has moved on without covering a field we still need.

use fi_protocol::FieldKind;

use crate::agent::MissingField;

const PRESSURE_WORDS: &[&str] = &["pressure", "psi"];
const VALVE_WORDS: &[&str] = &["valve", "open", "close"];

/// True when a pending static-pressure or control-valve field has no
/// related keyword anywhere in `transcription`.
pub fn should_interrupt(transcription: &str, pending: &[FieldKind]) -> bool {
    let lower = transcription.to_lowercase();
    pending.iter().any(|field| match field {
        FieldKind::StaticPressure => !matches_any(&lower, PRESSURE_WORDS),
        FieldKind::ControlValve => !matches_any(&lower, VALVE_WORDS),
        FieldKind::ButterflyValve | FieldKind::Corrosion => false,
    })
}

/// Distinct field kinds among `missing`, in first-seen order.
pub fn pending_fields(missing: &[MissingField]) -> Vec<FieldKind> {
    let mut fields = Vec::new();
    for m in missing {
        if !fields.contains(&m.field) {
            fields.push(m.field);
        }
    }
    fields
}

fn matches_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

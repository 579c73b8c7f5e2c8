//! Transcript → riser readings.

use chrono::{DateTime, Utc};

use fi_protocol::{GaugeKind, GaugeReading, RiserReading};

use crate::patterns;

/// Extract one reading per riser mention, stamping gauges with the current time.
pub fn extract(transcript: &str) -> Vec<RiserReading> {
    extract_at(transcript, Utc::now())
}

/// Extract one reading per riser mention.
///
/// Field values are scanned from the whole transcript and shared by every
/// reading. Duplicate riser numbers yield independent readings; merging is
/// left to the caller. Unstated valve and corrosion fields are `Unknown`.
pub fn extract_at(transcript: &str, at: DateTime<Utc>) -> Vec<RiserReading> {
    let risers = patterns::riser_mentions(transcript);
    if risers.is_empty() {
        tracing::debug!("no riser mentions in transcript");
        return Vec::new();
    }

    let static_pressure = patterns::static_pressure(transcript);
    let residual_pressure = patterns::residual_pressure(transcript);
    let control_valve_status = patterns::control_valve(transcript);
    let butterfly_valve_status = patterns::butterfly_valve(transcript);
    let corrosion = patterns::corrosion(transcript);

    let mut gauge_readings = Vec::new();
    if let Some(psi) = static_pressure {
        gauge_readings.push(GaugeReading::psi(GaugeKind::Static, psi, at));
    }
    if let Some(psi) = residual_pressure {
        gauge_readings.push(GaugeReading::psi(GaugeKind::Residual, psi, at));
    }

    tracing::debug!(
        risers = risers.len(),
        static_psi = ?static_pressure,
        residual_psi = ?residual_pressure,
        control_valve = %control_valve_status,
        "extracted riser readings"
    );

    risers
        .into_iter()
        .map(|riser_number| RiserReading {
            riser_number,
            static_pressure,
            residual_pressure,
            control_valve_status,
            butterfly_valve_status,
            corrosion,
            gauge_readings: gauge_readings.clone(),
        })
        .collect()
}

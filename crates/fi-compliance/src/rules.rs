//! Rule evaluation over riser readings.
//!
//! Rules run per riser in display order: static pressure, control valve,
//! corrosion. Evaluation is pure; the same readings always produce the
//! same checks.

use std::ops::RangeInclusive;

use fi_protocol::{CheckStatus, ComplianceCheck, ControlValveStatus, Corrosion, RiserReading};

use crate::references;

/// Acceptable static pressure, inclusive on both ends.
pub const STATIC_PRESSURE_RANGE_PSI: RangeInclusive<f64> = 30.0..=250.0;

/// Evaluate readings against the NFPA 25 rule set.
///
/// An empty slice yields exactly one failing "Riser Inspection Required"
/// check and nothing else.
pub fn evaluate(readings: &[RiserReading]) -> Vec<ComplianceCheck> {
    if readings.is_empty() {
        return vec![ComplianceCheck::new(
            "Riser Inspection Required",
            CheckStatus::Fail,
            "No riser data found in inspection",
            references::RISER_INSPECTION,
        )];
    }

    let mut checks = Vec::with_capacity(readings.len() * 3);
    for riser in readings {
        checks.extend(static_pressure_check(riser));
        checks.push(control_valve_check(riser));
        checks.push(corrosion_check(riser));
    }

    tracing::debug!(
        risers = readings.len(),
        checks = checks.len(),
        failures = checks.iter().filter(|c| c.is_fail()).count(),
        "compliance evaluated"
    );
    checks
}

/// A stated pressure is checked against the range. An unstated one produces
/// no check; it surfaces as a missing field instead.
fn static_pressure_check(riser: &RiserReading) -> Option<ComplianceCheck> {
    let psi = riser.stated_static()?;
    let requirement = format!("Riser {} Static Pressure", riser.riser_number);

    let check = if STATIC_PRESSURE_RANGE_PSI.contains(&psi) {
        ComplianceCheck::new(
            requirement,
            CheckStatus::Pass,
            format!("Static pressure {} PSI is within acceptable range", fmt_psi(psi)),
            references::STATIC_PRESSURE,
        )
    } else {
        ComplianceCheck::new(
            requirement,
            CheckStatus::Fail,
            format!(
                "Static pressure {} PSI is outside the acceptable range of {}-{} PSI",
                fmt_psi(psi),
                fmt_psi(*STATIC_PRESSURE_RANGE_PSI.start()),
                fmt_psi(*STATIC_PRESSURE_RANGE_PSI.end()),
            ),
            references::STATIC_PRESSURE,
        )
    };
    Some(check)
}

fn control_valve_check(riser: &RiserReading) -> ComplianceCheck {
    let requirement = format!("Riser {} Control Valve", riser.riser_number);
    match riser.control_valve_status {
        ControlValveStatus::Open => ComplianceCheck::new(
            requirement,
            CheckStatus::Pass,
            "Control valve is properly open",
            references::CONTROL_VALVE,
        ),
        other => ComplianceCheck::new(
            requirement,
            CheckStatus::Fail,
            format!("Control valve is {other}, must be open for inspection"),
            references::CONTROL_VALVE,
        ),
    }
}

// Minor and unknown corrosion both pass.
fn corrosion_check(riser: &RiserReading) -> ComplianceCheck {
    let requirement = format!("Riser {} Corrosion Inspection", riser.riser_number);
    let (status, message) = match riser.corrosion {
        Corrosion::Severe => (
            CheckStatus::Fail,
            "Severe corrosion detected - immediate maintenance required",
        ),
        Corrosion::Moderate => (
            CheckStatus::Warning,
            "Moderate corrosion detected - maintenance recommended",
        ),
        Corrosion::None | Corrosion::Minor | Corrosion::Unknown => {
            (CheckStatus::Pass, "No significant corrosion detected")
        }
    };
    ComplianceCheck::new(requirement, status, message, references::CORROSION)
}

/// Whole numbers print without a decimal point ("55", not "55.0").
fn fmt_psi(psi: f64) -> String {
    if psi.fract() == 0.0 {
        format!("{psi:.0}")
    } else {
        format!("{psi}")
    }
}

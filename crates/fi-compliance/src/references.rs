//! NFPA 25 section citations attached to each rule.

/// Riser inspection required (no riser data at all).
pub const RISER_INSPECTION: &str = "NFPA 25 5.3.1";

/// Static pressure gauge reading.
pub const STATIC_PRESSURE: &str = "NFPA 25 5.3.2.1";

/// Control valve position.
pub const CONTROL_VALVE: &str = "NFPA 25 5.3.3.1";

/// Pipe and fitting corrosion.
pub const CORROSION: &str = "NFPA 25 5.2.1.1";

use serde::Serialize;
use strum_macros::Display;

/// Categorical collision risk, derived from probability thresholds.
/// The ordering is by severity, so `max` picks the worse level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Threshold mapping; the boundaries are inclusive, so a probability
    /// of exactly 0.1 is critical.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.1 {
            RiskLevel::Critical
        } else if probability >= 0.01 {
            RiskLevel::High
        } else if probability >= 0.001 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn recommended_action(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "immediate avoidance maneuver",
            RiskLevel::High => "prepare maneuver, monitor closely",
            RiskLevel::Medium => "enhanced monitoring",
            RiskLevel::Low => "continue normal monitoring",
        }
    }
}

/// Closest-approach summary for one (primary, secondary) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ConjunctionEvent {
    pub primary: u32,
    pub secondary: u32,
    /// Collision probability in [0, 1] from the distance-based proxy.
    pub probability: f64,
    pub min_separation_km: f64,
    /// Hours from the start of the screening window to closest approach;
    /// zero for an instantaneous assessment.
    pub time_to_closest_approach_hours: f64,
    pub relative_velocity_km_s: f64,
    pub risk_level: RiskLevel,
}

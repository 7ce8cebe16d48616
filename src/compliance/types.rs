use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// The fixed debris-mitigation requirement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Requirement {
    DebrisRelease,
    BreakupPotential,
    PostMissionDisposal,
    CollisionAvoidance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    NonCompliant,
    /// Required design metadata was not supplied; the score is not a
    /// guess, it is absent.
    CannotEvaluate,
}

impl ComplianceStatus {
    /// Score bands: >= 80 compliant, >= 60 warning, below that
    /// non-compliant.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ComplianceStatus::Compliant
        } else if score >= 60.0 {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::NonCompliant
        }
    }
}

/// One requirement evaluated against one object.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceRecord {
    pub requirement: Requirement,
    pub status: ComplianceStatus,
    pub score: f64,
    pub rationale: String,
}

/// Design attributes a TLE cannot encode. Callers supply these from
/// operator declarations; absent flags yield `CannotEvaluate` rather than
/// a defaulted score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignMetadata {
    /// Passivation / stored-energy release measures are in place.
    pub explosion_prevention: Option<bool>,
    /// The object can actively deorbit at end of mission.
    pub active_deorbit: Option<bool>,
    /// The object can maneuver to avoid a predicted conjunction.
    pub maneuverable: Option<bool>,
    pub mass_kg: Option<f64>,
    pub cross_section_m2: Option<f64>,
}

impl DesignMetadata {
    /// Ballistic coefficient m/(Cd*A) in kg/m^2 when both inputs are
    /// declared.
    pub fn ballistic_coefficient(&self) -> Option<f64> {
        match (self.mass_kg, self.cross_section_m2) {
            (Some(m), Some(a)) if a > 0.0 => Some(m / (2.2 * a)),
            _ => None,
        }
    }
}

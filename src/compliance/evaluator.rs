//! Fixed debris-mitigation rule set, scored against the orbit plus
//! caller-declared design attributes. Two of the four requirements are
//! design-level facts a TLE cannot encode; absent declarations surface as
//! `CannotEvaluate`, never as invented scores.

use crate::compliance::types::{ComplianceRecord, ComplianceStatus, DesignMetadata, Requirement};
use crate::propagation::{StateVector, EARTH_RADIUS_KM};
use crate::tle::TrackedObject;

/// Assumed m/(Cd*A) when mass and cross-section are undeclared (kg/m^2).
pub const DEFAULT_BALLISTIC_COEFFICIENT: f64 = 100.0;

/// Natural-decay limit for post-mission disposal (years).
const DISPOSAL_LIMIT_YEARS: f64 = 25.0;

/// Evaluate all four requirements. Always returns four records, in
/// requirement order.
pub fn evaluate(
    object: &TrackedObject,
    current_state: &StateVector,
    metadata: &DesignMetadata,
) -> Vec<ComplianceRecord> {
    vec![
        debris_release(current_state),
        breakup_potential(metadata),
        post_mission_disposal(object, metadata),
        collision_avoidance(metadata),
    ]
}

/// Requirement 1: operating-altitude band. Released debris below the
/// congested shells decays quickly; the 800-1000 km shell is the worst
/// place to shed anything.
fn debris_release(state: &StateVector) -> ComplianceRecord {
    let alt = state.altitude_km;
    let (score, band) = if alt < 450.0 {
        (92.0, "below 450 km, released debris decays within months")
    } else if alt < 600.0 {
        (85.0, "450-600 km, released debris decays within a few years")
    } else if alt < 800.0 {
        (68.0, "600-800 km, released debris persists for decades")
    } else if alt < 1000.0 {
        (55.0, "800-1000 km, the most congested debris shell")
    } else if alt < 2000.0 {
        (72.0, "above 1000 km, long-lived but sparsely populated")
    } else {
        (80.0, "above the congested low-Earth shells")
    };

    ComplianceRecord {
        requirement: Requirement::DebrisRelease,
        status: ComplianceStatus::from_score(score),
        score,
        rationale: format!("operating altitude {alt:.0} km: {band}"),
    }
}

/// Requirement 2: break-up-potential minimization. Purely a design
/// attribute (passivation, battery and propellant safing), so it is
/// scored from the declaration alone.
fn breakup_potential(metadata: &DesignMetadata) -> ComplianceRecord {
    let (status, score, rationale) = match metadata.explosion_prevention {
        Some(true) => (
            ComplianceStatus::from_score(90.0),
            90.0,
            "explosion-prevention design measures declared".to_string(),
        ),
        Some(false) => (
            ComplianceStatus::from_score(40.0),
            40.0,
            "no explosion-prevention design measures in place".to_string(),
        ),
        None => (
            ComplianceStatus::CannotEvaluate,
            0.0,
            "explosion-prevention declaration not supplied".to_string(),
        ),
    };
    ComplianceRecord {
        requirement: Requirement::BreakupPotential,
        status,
        score,
        rationale,
    }
}

/// Requirement 3: post-mission disposal. Natural decay from perigee
/// altitude and ballistic coefficient; estimates beyond the 25-year limit
/// need an active-deorbit declaration.
fn post_mission_disposal(object: &TrackedObject, metadata: &DesignMetadata) -> ComplianceRecord {
    let perigee_alt = object.elements.perigee_radius_km() - EARTH_RADIUS_KM;
    let (bc, bc_note) = match metadata.ballistic_coefficient() {
        Some(bc) => (bc, String::new()),
        None => (
            DEFAULT_BALLISTIC_COEFFICIENT,
            format!(" (assumed ballistic coefficient {DEFAULT_BALLISTIC_COEFFICIENT} kg/m^2)"),
        ),
    };
    let decay_years = estimated_decay_years(perigee_alt, bc);

    let (status, score, rationale) = if decay_years <= DISPOSAL_LIMIT_YEARS {
        let score = 95.0 - 0.6 * decay_years;
        (
            ComplianceStatus::from_score(score),
            score,
            format!("estimated natural decay in {decay_years:.1} years{bc_note}"),
        )
    } else {
        match metadata.active_deorbit {
            Some(true) => (
                ComplianceStatus::from_score(85.0),
                85.0,
                format!(
                    "natural decay estimate {decay_years:.0} years exceeds the 25-year \
                     limit, active-deorbit capability declared{bc_note}"
                ),
            ),
            Some(false) => (
                ComplianceStatus::from_score(35.0),
                35.0,
                format!(
                    "natural decay estimate {decay_years:.0} years exceeds the 25-year \
                     limit and no deorbit capability exists{bc_note}"
                ),
            ),
            None => (
                ComplianceStatus::CannotEvaluate,
                0.0,
                format!(
                    "natural decay estimate {decay_years:.0} years exceeds the 25-year \
                     limit and no active-deorbit declaration was supplied{bc_note}"
                ),
            ),
        }
    };

    ComplianceRecord {
        requirement: Requirement::PostMissionDisposal,
        status,
        score,
        rationale,
    }
}

/// Requirement 4: collision-avoidance capability, scored from the
/// maneuverability declaration.
fn collision_avoidance(metadata: &DesignMetadata) -> ComplianceRecord {
    let (status, score, rationale) = match metadata.maneuverable {
        Some(true) => (
            ComplianceStatus::from_score(95.0),
            95.0,
            "object can maneuver to avoid predicted conjunctions".to_string(),
        ),
        Some(false) => (
            ComplianceStatus::from_score(30.0),
            30.0,
            "object cannot maneuver".to_string(),
        ),
        None => (
            ComplianceStatus::CannotEvaluate,
            0.0,
            "maneuverability declaration not supplied".to_string(),
        ),
    };
    ComplianceRecord {
        requirement: Requirement::CollisionAvoidance,
        status,
        score,
        rationale,
    }
}

/// Lifetime lookup at a ballistic coefficient of 100 kg/m^2:
/// (perigee altitude km, years to natural decay).
const DECAY_TABLE: &[(f64, f64)] = &[
    (200.0, 0.1),
    (300.0, 1.0),
    (400.0, 3.0),
    (500.0, 10.0),
    (600.0, 25.0),
    (700.0, 60.0),
    (800.0, 150.0),
    (900.0, 400.0),
    (1000.0, 1200.0),
    (1200.0, 5000.0),
];

/// Estimate years to natural decay from perigee altitude, log-linear in
/// the lifetime table and scaled linearly by ballistic coefficient.
/// Perigees above the table are treated as effectively indefinite.
pub fn estimated_decay_years(perigee_altitude_km: f64, ballistic_coefficient: f64) -> f64 {
    let scale = (ballistic_coefficient / DEFAULT_BALLISTIC_COEFFICIENT).max(0.01);

    let (first_alt, first_years) = DECAY_TABLE[0];
    if perigee_altitude_km <= first_alt {
        return 0.5 * first_years * scale;
    }
    let (last_alt, last_years) = DECAY_TABLE[DECAY_TABLE.len() - 1];
    if perigee_altitude_km >= last_alt {
        return 2.0 * last_years * scale;
    }

    let mut years = last_years;
    for pair in DECAY_TABLE.windows(2) {
        let (alt_lo, years_lo) = pair[0];
        let (alt_hi, years_hi) = pair[1];
        if perigee_altitude_km < alt_hi {
            let frac = (perigee_altitude_km - alt_lo) / (alt_hi - alt_lo);
            years = (years_lo.ln() + frac * (years_hi.ln() - years_lo.ln())).exp();
            break;
        }
    }
    years * scale
}

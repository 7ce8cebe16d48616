use crate::conjunction::types::{ConjunctionEvent, RiskLevel};
use crate::propagation::StateVector;

/// Separations beyond this multiple of the combined hard-body radius score
/// zero probability.
pub const HARD_BODY_CUTOFF_RATIO: f64 = 10.0;

/// Distance-based collision probability proxy.
///
/// This is NOT a covariance miss-distance model: the engine ingests no
/// tracking covariance, so the honest estimate is a deterministic,
/// monotonically decreasing function of separation over the combined
/// hard-body radius, clamped to [0, 1] and cut off at
/// `HARD_BODY_CUTOFF_RATIO`.
pub fn collision_probability(separation_km: f64, combined_radius_km: f64) -> f64 {
    if combined_radius_km <= 0.0 {
        return 0.0;
    }
    let ratio = separation_km / combined_radius_km;
    if ratio > HARD_BODY_CUTOFF_RATIO {
        return 0.0;
    }
    (-0.5 * ratio * ratio).exp().clamp(0.0, 1.0)
}

/// Score one pair of states at a shared instant. The combined hard-body
/// radius is the conservative sum of the two object sizes.
pub fn assess_conjunction(
    primary_id: u32,
    secondary_id: u32,
    primary: &StateVector,
    secondary: &StateVector,
    primary_size_km: f64,
    secondary_size_km: f64,
) -> ConjunctionEvent {
    event_at(
        primary_id,
        secondary_id,
        primary,
        secondary,
        primary_size_km + secondary_size_km,
        0.0,
    )
}

pub(crate) fn event_at(
    primary_id: u32,
    secondary_id: u32,
    primary: &StateVector,
    secondary: &StateVector,
    combined_radius_km: f64,
    tca_hours: f64,
) -> ConjunctionEvent {
    let separation = primary.separation_km(secondary);
    let probability = collision_probability(separation, combined_radius_km);
    ConjunctionEvent {
        primary: primary_id,
        secondary: secondary_id,
        probability,
        min_separation_km: separation,
        time_to_closest_approach_hours: tca_hours,
        relative_velocity_km_s: primary.relative_speed_km_s(secondary),
        risk_level: RiskLevel::from_probability(probability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn state(position_km: [f64; 3], velocity_km_s: [f64; 3]) -> StateVector {
        StateVector {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            position_km,
            velocity_km_s,
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_km: 420.0,
        }
    }

    #[test]
    fn probability_never_increases_with_distance() {
        let radius = 0.01;
        let mut last = f64::INFINITY;
        for step in 0..200 {
            let separation = step as f64 * 0.001;
            let p = collision_probability(separation, radius);
            assert!(p <= last, "probability rose at separation {separation}");
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn probability_cuts_off_past_ten_radii() {
        let radius = 0.01;
        assert_eq!(collision_probability(radius * 10.1, radius), 0.0);
        assert!(collision_probability(radius * 9.9, radius) > 0.0);
    }

    #[test]
    fn coincident_states_are_critical() {
        let a = state([7000.0, 0.0, 0.0], [0.0, 7.5, 0.0]);
        let b = state([7000.0, 0.0, 0.0], [0.0, -7.5, 0.0]);
        let event = assess_conjunction(1, 2, &a, &b, 0.005, 0.001);

        assert_relative_eq!(event.probability, 1.0);
        assert_eq!(event.risk_level, RiskLevel::Critical);
        assert_relative_eq!(event.min_separation_km, 0.0);
        assert_relative_eq!(event.relative_velocity_km_s, 15.0);
    }

    #[test]
    fn distant_states_are_low_risk() {
        let a = state([7000.0, 0.0, 0.0], [0.0, 7.5, 0.0]);
        let b = state([-7000.0, 0.0, 0.0], [0.0, -7.5, 0.0]);
        let event = assess_conjunction(1, 2, &a, &b, 0.005, 0.001);

        assert_eq!(event.probability, 0.0);
        assert_eq!(event.risk_level, RiskLevel::Low);
        assert_relative_eq!(event.min_separation_km, 14_000.0);
    }
}

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;

use crate::conjunction::scorer::event_at;
use crate::conjunction::types::ConjunctionEvent;
use crate::propagation::{propagate, PropagationError, StateVector};
use crate::tle::{ObjectClass, TrackedObject};

/// Assumed hard-body radii when the catalog carries no physical data.
const SATELLITE_RADIUS_KM: f64 = 0.005;
const DEBRIS_RADIUS_KM: f64 = 0.001;

/// Closest-approach refinement resolution (seconds).
const FINE_STEP_SECONDS: f64 = 1.0;

pub fn object_radius_km(class: ObjectClass) -> f64 {
    match class {
        ObjectClass::Satellite => SATELLITE_RADIUS_KM,
        ObjectClass::Debris => DEBRIS_RADIUS_KM,
    }
}

/// Sampling window for closest-approach search.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningWindow {
    pub start: DateTime<Utc>,
    pub horizon: Duration,
    pub step: Duration,
    /// Pairs whose closest approach stays beyond this separation are not
    /// reported.
    pub report_threshold_km: f64,
}

impl ScreeningWindow {
    pub fn starting(start: DateTime<Utc>) -> Self {
        Self {
            start,
            horizon: Duration::hours(48),
            step: Duration::seconds(60),
            report_threshold_km: 10.0,
        }
    }
}

#[derive(Debug)]
pub struct ScreeningFailure {
    pub catalog_number: u32,
    pub error: PropagationError,
}

/// Partial results: reported close approaches alongside the objects that
/// could not be screened. One bad object never aborts the run.
#[derive(Debug, Default)]
pub struct ScreeningOutcome {
    pub events: Vec<ConjunctionEvent>,
    pub failures: Vec<ScreeningFailure>,
}

/// Find the closest approach between two objects over the window.
///
/// Both objects are propagated to the same sample times, every
/// `window.step` across the horizon, then the best sample is refined by
/// ternary search down to one second. If either object decays mid-window
/// the search is truncated at the decay; a decay before the first sample
/// is an error.
pub fn screen_pair(
    primary: &TrackedObject,
    secondary: &TrackedObject,
    window: &ScreeningWindow,
) -> Result<ConjunctionEvent, PropagationError> {
    let step_s = window.step.num_seconds().max(1);
    let horizon_s = window.horizon.num_seconds().max(0);

    let mut best: Option<(f64, StateVector, StateVector)> = None;
    let mut best_offset_s = 0.0_f64;

    let mut offset = 0;
    while offset <= horizon_s {
        let at = window.start + Duration::seconds(offset);
        match sample_pair(primary, secondary, at) {
            Ok((p, s)) => {
                let separation = p.separation_km(&s);
                if best.as_ref().map_or(true, |(d, _, _)| separation < *d) {
                    best = Some((separation, p, s));
                    best_offset_s = offset as f64;
                }
            }
            Err(e) if e.is_decayed() && best.is_some() => break,
            Err(e) => return Err(e),
        }
        offset += step_s;
    }

    // best is always set here: the first sample either succeeded or the
    // loop returned its error.
    let (_, coarse_p, coarse_s) = best.expect("screening window produced no samples");

    let (tca_s, p_state, s_state) = refine_minimum(
        primary,
        secondary,
        window.start,
        (best_offset_s - step_s as f64).max(0.0),
        (best_offset_s + step_s as f64).min(horizon_s as f64),
    )
    .unwrap_or((best_offset_s, coarse_p, coarse_s));

    let combined_radius =
        object_radius_km(primary.class) + object_radius_km(secondary.class);
    Ok(event_at(
        primary.catalog_number(),
        secondary.catalog_number(),
        &p_state,
        &s_state,
        combined_radius,
        tca_s / 3600.0,
    ))
}

/// Screen one primary against a catalog slice. Pairs are scored on a
/// rayon pool; per-object propagation failures are isolated and reported
/// alongside the events.
pub fn screen_catalog(
    primary: &TrackedObject,
    others: &[TrackedObject],
    window: &ScreeningWindow,
) -> ScreeningOutcome {
    let results: Vec<_> = others
        .par_iter()
        .filter(|o| o.catalog_number() != primary.catalog_number())
        .map(|o| (o.catalog_number(), screen_pair(primary, o, window)))
        .collect();

    let mut outcome = ScreeningOutcome::default();
    for (catalog_number, result) in results {
        match result {
            Ok(event) => {
                if event.min_separation_km <= window.report_threshold_km {
                    outcome.events.push(event);
                }
            }
            Err(error) => {
                log::warn!("screening skipped object {catalog_number}: {error}");
                outcome.failures.push(ScreeningFailure {
                    catalog_number,
                    error,
                });
            }
        }
    }

    outcome.events.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then(a.min_separation_km.total_cmp(&b.min_separation_km))
    });
    outcome
}

fn sample_pair(
    primary: &TrackedObject,
    secondary: &TrackedObject,
    at: DateTime<Utc>,
) -> Result<(StateVector, StateVector), PropagationError> {
    Ok((
        propagate(&primary.elements, at)?,
        propagate(&secondary.elements, at)?,
    ))
}

/// Ternary search for the separation minimum between two bracketing
/// offsets (seconds from window start). Returns None if propagation fails
/// inside the bracket, in which case the caller keeps the coarse sample.
fn refine_minimum(
    primary: &TrackedObject,
    secondary: &TrackedObject,
    start: DateTime<Utc>,
    mut lo_s: f64,
    mut hi_s: f64,
) -> Option<(f64, StateVector, StateVector)> {
    let separation_at = |offset_s: f64| -> Option<f64> {
        let at = start + Duration::milliseconds((offset_s * 1000.0).round() as i64);
        sample_pair(primary, secondary, at)
            .ok()
            .map(|(p, s)| p.separation_km(&s))
    };

    while hi_s - lo_s > FINE_STEP_SECONDS {
        let third = (hi_s - lo_s) / 3.0;
        let m1 = lo_s + third;
        let m2 = hi_s - third;
        match (separation_at(m1), separation_at(m2)) {
            (Some(d1), Some(d2)) => {
                if d1 < d2 {
                    hi_s = m2;
                } else {
                    lo_s = m1;
                }
            }
            _ => return None,
        }
    }

    let mid = 0.5 * (lo_s + hi_s);
    let at = start + Duration::milliseconds((mid * 1000.0).round() as i64);
    sample_pair(primary, secondary, at)
        .ok()
        .map(|(p, s)| (mid, p, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction::types::RiskLevel;
    use crate::tle;
    use chrono::TimeZone;

    const ISS_L1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_L2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    fn primary() -> TrackedObject {
        TrackedObject::new(
            "ISS (ZARYA)",
            ObjectClass::Satellite,
            tle::parse(ISS_L1, ISS_L2).unwrap(),
        )
    }

    fn shadow(catalog_number: u32) -> TrackedObject {
        // Same orbit as the primary under a different catalog number
        let mut elements = tle::parse(ISS_L1, ISS_L2).unwrap();
        elements.catalog_number = catalog_number;
        TrackedObject::new("SHADOW DEB", ObjectClass::Debris, elements)
    }

    fn far_away(catalog_number: u32) -> TrackedObject {
        // ~300 km higher orbit, so the radial gap alone keeps the pair
        // well beyond any reporting threshold
        let mut elements = tle::parse(ISS_L1, ISS_L2).unwrap();
        elements.catalog_number = catalog_number;
        elements.mean_motion_rev_day = 14.2;
        elements.raan_deg = (elements.raan_deg + 180.0) % 360.0;
        TrackedObject::new("OTHER SAT", ObjectClass::Satellite, elements)
    }

    fn decayed_before_window(catalog_number: u32) -> TrackedObject {
        let epoch = tle::parse(ISS_L1, ISS_L2).unwrap().epoch - Duration::days(3);
        TrackedObject::new(
            "FALLING DEB",
            ObjectClass::Debris,
            crate::tle::OrbitalElementSet {
                catalog_number,
                epoch,
                mean_motion_rev_day: 16.5,
                eccentricity: 0.001,
                inclination_deg: 51.6,
                raan_deg: 10.0,
                arg_perigee_deg: 30.0,
                mean_anomaly_deg: 0.0,
                bstar: 0.1,
            },
        )
    }

    fn short_window(start: chrono::DateTime<Utc>) -> ScreeningWindow {
        ScreeningWindow {
            start,
            horizon: Duration::hours(2),
            step: Duration::seconds(60),
            report_threshold_km: 10.0,
        }
    }

    #[test]
    fn coincident_orbits_score_critical() {
        let p = primary();
        let window = short_window(p.elements.epoch);
        let event = screen_pair(&p, &shadow(90001), &window).unwrap();

        assert!(event.min_separation_km < 0.001);
        assert_eq!(event.risk_level, RiskLevel::Critical);
        assert!(event.time_to_closest_approach_hours < 0.05);
    }

    #[test]
    fn catalog_screening_isolates_failures() {
        let p = primary();
        let window = short_window(p.elements.epoch);
        let others = vec![shadow(90001), far_away(90002), decayed_before_window(90003)];

        let outcome = screen_catalog(&p, &others, &window);

        // The shadow object is the only reportable approach; the distant
        // one stays beyond the threshold, the decayed one is a failure.
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].secondary, 90001);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].catalog_number, 90003);
        assert!(outcome.failures[0].error.is_decayed());
    }

    #[test]
    fn primary_is_never_screened_against_itself() {
        let p = primary();
        let window = short_window(p.elements.epoch);
        let outcome = screen_catalog(&p, &[p.clone()], &window);
        assert!(outcome.events.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn screening_is_deterministic() {
        let p = primary();
        let window = short_window(p.elements.epoch);
        let a = screen_pair(&p, &far_away(90002), &window).unwrap();
        let b = screen_pair(&p, &far_away(90002), &window).unwrap();
        assert_eq!(a.min_separation_km, b.min_separation_km);
        assert_eq!(
            a.time_to_closest_approach_hours,
            b.time_to_closest_approach_hours
        );
        assert_eq!(a.probability, b.probability);
    }

    #[test]
    fn default_window_covers_forty_eight_hours() {
        let window = ScreeningWindow::starting(Utc.with_ymd_and_hms(2019, 12, 9, 16, 0, 0).unwrap());
        assert_eq!(window.horizon, Duration::hours(48));
        assert_eq!(window.step, Duration::seconds(60));
    }
}

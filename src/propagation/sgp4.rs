//! Simplified general perturbations propagation.
//!
//! Near-Earth orbits (period < 225 min) carry J2 secular rates plus B*
//! drag decay of the semi-major axis; deep-space orbits take the
//! SDP4-class branch with J2 secular rates only (resonance and lunisolar
//! terms are out of scope, as are the C4/C5 eccentricity drag terms).
//! Everything here is deterministic: the same (elements, time) pair always
//! produces the same state vector.

use chrono::{DateTime, Duration, Utc};

use crate::propagation::constants::{
    CK2, DEEP_SPACE_PERIOD_MIN, EARTH_RADIUS_KM, J2, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE_RAD,
    QOMS2T, S_PARAM, XKE,
};
use crate::propagation::error::PropagationError;
use crate::propagation::geodetic::{ecef_to_geodetic, gmst_rad, julian_date, teme_to_ecef};
use crate::propagation::types::StateVector;
use crate::tle::OrbitalElementSet;

/// Time-independent quantities derived once per element set.
struct ModelInit {
    /// Brouwer semi-major axis (earth radii).
    a0dp: f64,
    /// Brouwer mean motion (rad/min).
    n0dp: f64,
    e0: f64,
    i_rad: f64,
    raan0: f64,
    argp0: f64,
    m0: f64,
    m_dot: f64,
    argp_dot: f64,
    raan_dot: f64,
    /// Drag decay coefficient; zero on the deep-space branch.
    c1: f64,
}

fn init(elements: &OrbitalElementSet) -> Result<ModelInit, PropagationError> {
    let i_rad = elements.inclination_deg.to_radians();
    let e0 = elements.eccentricity;
    let n0 = elements.mean_motion_rev_day * std::f64::consts::TAU / 1440.0;

    let cos_i = i_rad.cos();
    let theta2 = cos_i * cos_i;
    let x3thm1 = 3.0 * theta2 - 1.0;
    let beta0sq = 1.0 - e0 * e0;
    let beta0 = beta0sq.sqrt();

    // Kozai mean motion -> Brouwer (standard recovery series)
    let a1 = (XKE / n0).powf(2.0 / 3.0);
    let del_common = 1.5 * CK2 * x3thm1 / beta0sq.powf(1.5);
    let del1 = del_common / (a1 * a1);
    let a0 = a1 * (1.0 - del1 * (1.0 / 3.0 + del1 * (1.0 + 134.0 / 81.0 * del1)));
    let del0 = del_common / (a0 * a0);
    let n0dp = n0 / (1.0 + del0);
    let a0dp = (XKE / n0dp).powf(2.0 / 3.0);

    if a0dp <= S_PARAM {
        // Below the density-profile floor there is no orbit to propagate.
        return Err(PropagationError::Decayed {
            catalog_number: elements.catalog_number,
            altitude_km: (a0dp * (1.0 - e0) - 1.0) * EARTH_RADIUS_KM,
        });
    }

    let p = a0dp * beta0sq;
    let pinvsq = 1.0 / (p * p);
    let sin2_i = 1.0 - theta2;
    let m_dot = n0dp * (1.0 + 1.5 * J2 * pinvsq * beta0 * (1.0 - 1.5 * sin2_i));
    let argp_dot = 1.5 * J2 * pinvsq * n0dp * (2.0 - 2.5 * sin2_i);
    let raan_dot = -1.5 * J2 * pinvsq * n0dp * cos_i;

    let deep_space = std::f64::consts::TAU / n0dp >= DEEP_SPACE_PERIOD_MIN;
    let c1 = if deep_space {
        0.0
    } else {
        let xi = 1.0 / (a0dp - S_PARAM);
        let eta = a0dp * e0 * xi;
        let eta2 = eta * eta;
        let psisq = (1.0 - eta2).abs().max(1e-6);
        let coef1 = QOMS2T * xi.powi(4) / psisq.powf(3.5);
        let c2 = coef1
            * n0dp
            * (a0dp * (1.0 + 1.5 * eta2 + 4.0 * e0 * eta + e0 * eta * eta2)
                + 0.75 * CK2 * xi / psisq * x3thm1 * (8.0 + 24.0 * eta2 + 3.0 * eta2 * eta2));
        elements.bstar * c2
    };

    Ok(ModelInit {
        a0dp,
        n0dp,
        e0,
        i_rad,
        raan0: elements.raan_deg.to_radians(),
        argp0: elements.arg_perigee_deg.to_radians(),
        m0: elements.mean_anomaly_deg.to_radians(),
        m_dot,
        argp_dot,
        raan_dot,
        c1,
    })
}

/// Advance an element set to `at` and derive the full state vector.
pub fn propagate(
    elements: &OrbitalElementSet,
    at: DateTime<Utc>,
) -> Result<StateVector, PropagationError> {
    let model = init(elements)?;
    let catalog_number = elements.catalog_number;

    let tsince = at
        .signed_duration_since(elements.epoch)
        .num_milliseconds() as f64
        / 60_000.0;

    let m_df = model.m0 + model.m_dot * tsince;
    let argp = model.argp0 + model.argp_dot * tsince;
    let raan = model.raan0 + model.raan_dot * tsince;

    let tempa = 1.0 - model.c1 * tsince;
    if tempa <= 0.0 {
        return Err(PropagationError::Decayed {
            catalog_number,
            altitude_km: -EARTH_RADIUS_KM,
        });
    }
    let a_t = model.a0dp * tempa * tempa;
    let m_t = m_df + 1.5 * model.n0dp * model.c1 * tsince * tsince;
    let e_t = model.e0;

    let ea = solve_kepler(normalize_angle(m_t), e_t).map_err(|residual| {
        PropagationError::NumericDivergence {
            catalog_number,
            residual,
        }
    })?;

    let (sin_ea, cos_ea) = ea.sin_cos();
    let r = a_t * (1.0 - e_t * cos_ea);
    let nu = ((1.0 - e_t * e_t).sqrt() * sin_ea).atan2(cos_ea - e_t);
    let p_semi = a_t * (1.0 - e_t * e_t);

    let (sin_nu, cos_nu) = nu.sin_cos();
    let r_pqw = [r * cos_nu, r * sin_nu, 0.0];
    let v_factor = XKE / p_semi.sqrt();
    let v_pqw = [-v_factor * sin_nu, v_factor * (e_t + cos_nu), 0.0];

    let rot = perifocal_to_eci(raan, model.i_rad, argp);
    let mut position_km = [0.0; 3];
    let mut velocity_km_s = [0.0; 3];
    for j in 0..3 {
        for k in 0..3 {
            position_km[j] += rot[j][k] * r_pqw[k];
            velocity_km_s[j] += rot[j][k] * v_pqw[k];
        }
        position_km[j] *= EARTH_RADIUS_KM;
        // earth radii per minute -> km/s
        velocity_km_s[j] *= EARTH_RADIUS_KM / 60.0;
    }

    let gmst = gmst_rad(julian_date(at));
    let ecef = teme_to_ecef(position_km, gmst);
    let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);

    if altitude_km < 0.0 {
        return Err(PropagationError::Decayed {
            catalog_number,
            altitude_km,
        });
    }

    Ok(StateVector {
        timestamp: at,
        position_km,
        velocity_km_s,
        latitude_deg,
        longitude_deg,
        altitude_km,
    })
}

/// Fixed-step trajectory over [start, end].
pub fn sample_track(
    elements: &OrbitalElementSet,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<Vec<StateVector>, PropagationError> {
    let mut cursor = start;
    let mut points = Vec::new();
    while cursor <= end {
        points.push(propagate(elements, cursor)?);
        cursor += step;
    }
    Ok(points)
}

/// Rotation from the perifocal (PQW) frame into ECI.
fn perifocal_to_eci(raan: f64, incl: f64, argp: f64) -> [[f64; 3]; 3] {
    let (sin_raan, cos_raan) = raan.sin_cos();
    let (sin_argp, cos_argp) = argp.sin_cos();
    let (sin_i, cos_i) = incl.sin_cos();

    [
        [
            cos_raan * cos_argp - sin_raan * sin_argp * cos_i,
            -cos_raan * sin_argp - sin_raan * cos_argp * cos_i,
            sin_raan * sin_i,
        ],
        [
            sin_raan * cos_argp + cos_raan * sin_argp * cos_i,
            -sin_raan * sin_argp + cos_raan * cos_argp * cos_i,
            -cos_raan * sin_i,
        ],
        [sin_argp * sin_i, cos_argp * sin_i, cos_i],
    ]
}

/// Normalize an angle to [0, 2pi).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % std::f64::consts::TAU;
    if a < 0.0 {
        a + std::f64::consts::TAU
    } else {
        a
    }
}

/// Newton-Raphson solution of Kepler's equation M = E - e sin E.
/// Converges to within the tolerance or reports the residual after the
/// iteration cap.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, f64> {
    let mut ea = if eccentricity < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = ea - eccentricity * ea.sin() - mean_anomaly;
        let fp = 1.0 - eccentricity * ea.cos();
        let delta = f / fp;
        ea -= delta;
        if delta.abs() <= KEPLER_TOLERANCE_RAD {
            return Ok(ea);
        }
    }

    let residual = (ea - eccentricity * ea.sin() - mean_anomaly).abs();
    if residual <= KEPLER_TOLERANCE_RAD {
        Ok(ea)
    } else {
        Err(residual)
    }
}

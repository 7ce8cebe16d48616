//! Gravity-model and ellipsoid constants. Propagation runs on the WGS-72
//! model; the geodetic conversion uses the WGS-84 ellipsoid.

/// WGS-72 gravitational parameter (km^3/s^2).
pub const MU_EARTH_KM3_S2: f64 = 398_600.8;
/// WGS-72 equatorial radius (km).
pub const EARTH_RADIUS_KM: f64 = 6378.135;
/// WGS-72 second zonal harmonic.
pub const J2: f64 = 1.082_616e-3;

/// sqrt(mu) in earth-radii^1.5 per minute.
pub const XKE: f64 = 7.436_691_613_317_342e-2;
/// 0.5 * J2 (canonical units).
pub const CK2: f64 = 5.413_08e-4;
/// ((120 - 78) / 6378.135)^4, the (q0 - s)^4 density constant.
pub const QOMS2T: f64 = 1.880_279e-9;
/// Density-profile parameter s, 1 + 78 km in earth radii.
pub const S_PARAM: f64 = 1.012_229_28;

/// WGS-84 ellipsoid, for geodetic output.
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.006_694_379_990_14;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Orbital periods at or above this are deep-space (SDP4-class) orbits.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

pub const KEPLER_TOLERANCE_RAD: f64 = 1e-8;
pub const KEPLER_MAX_ITERATIONS: usize = 10;

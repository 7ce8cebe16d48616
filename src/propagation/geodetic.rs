//! Earth-orientation helpers: sidereal time, frame rotation, and the
//! oblate-spheroid geodetic conversion.

use chrono::{DateTime, Utc};

use crate::propagation::constants::{WGS84_A_KM, WGS84_E2};

/// Julian date of a UTC instant.
pub fn julian_date(at: DateTime<Utc>) -> f64 {
    2_440_587.5 + at.timestamp_micros() as f64 / 86_400.0e6
}

/// Greenwich Mean Sidereal Time (IAU-82) in radians, [0, 2pi).
pub fn gmst_rad(jd_ut1: f64) -> f64 {
    let tut1 = (jd_ut1 - 2_451_545.0) / 36_525.0;
    let mut temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093_104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;
    // seconds -> degrees (divide by 240) -> radians
    temp = (temp.to_radians() / 240.0) % std::f64::consts::TAU;
    if temp < 0.0 {
        temp += std::f64::consts::TAU;
    }
    temp
}

/// Rotate a TEME position into the Earth-fixed frame.
pub fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// ECEF position to geodetic latitude (deg), longitude (deg, [-180, 180)),
/// and altitude above the WGS-84 ellipsoid (km). The latitude iteration is
/// run a fixed five times, which converges to well under a meter.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let longitude = wrap_longitude_deg(y.atan2(x).to_degrees());

    let r_xy = (x * x + y * y).sqrt();
    let mut lat = z.atan2(r_xy);
    let mut n = WGS84_A_KM;
    for _ in 0..5 {
        let sin_lat = lat.sin();
        n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + n * WGS84_E2 * sin_lat).atan2(r_xy);
    }

    let altitude = if lat.cos().abs() > 1e-10 {
        r_xy / lat.cos() - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    (lat.to_degrees(), longitude, altitude)
}

/// Wrap a longitude in degrees to [-180, 180).
pub fn wrap_longitude_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gmst_at_j2000_epoch() {
        // GMST at J2000.0 is 280.4606 degrees
        let gmst = gmst_rad(2_451_545.0);
        assert_relative_eq!(gmst.to_degrees(), 280.4606, epsilon = 1e-3);
    }

    #[test]
    fn longitude_wrap_covers_both_edges() {
        assert_relative_eq!(wrap_longitude_deg(180.0), -180.0);
        assert_relative_eq!(wrap_longitude_deg(-180.0), -180.0);
        assert_relative_eq!(wrap_longitude_deg(540.0), -180.0);
        assert_relative_eq!(wrap_longitude_deg(359.0), -1.0);
        assert_relative_eq!(wrap_longitude_deg(-190.0), 170.0);
        assert_relative_eq!(wrap_longitude_deg(45.5), 45.5);
    }

    #[test]
    fn equatorial_point_round_trips() {
        // A point on the equator at the prime meridian, 400 km up
        let (lat, lon, alt) = ecef_to_geodetic([WGS84_A_KM + 400.0, 0.0, 0.0]);
        assert_relative_eq!(lat, 0.0, epsilon = 1e-9);
        assert_relative_eq!(lon, 0.0, epsilon = 1e-9);
        assert_relative_eq!(alt, 400.0, epsilon = 1e-6);
    }

    #[test]
    fn polar_point_altitude_uses_polar_radius() {
        let polar_radius = WGS84_A_KM * (1.0 - WGS84_E2).sqrt();
        let (lat, _, alt) = ecef_to_geodetic([0.0, 0.0, polar_radius + 500.0]);
        assert_relative_eq!(lat, 90.0, epsilon = 1e-6);
        assert_relative_eq!(alt, 500.0, epsilon = 0.5);
    }
}

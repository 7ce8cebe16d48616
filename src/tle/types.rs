use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::propagation::{DEEP_SPACE_PERIOD_MIN, MINUTES_PER_DAY, MU_EARTH_KM3_S2, SECONDS_PER_DAY};

/// Mean orbital elements decoded from one TLE record, frozen at its epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    pub catalog_number: u32,
    pub epoch: DateTime<Utc>,
    /// Mean motion (revolutions/day), > 0.
    pub mean_motion_rev_day: f64,
    /// Eccentricity, 0 <= e < 1.
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    /// B* drag term (1/earth radii).
    pub bstar: f64,
}

impl OrbitalElementSet {
    pub fn period_minutes(&self) -> f64 {
        MINUTES_PER_DAY / self.mean_motion_rev_day
    }

    /// Semi-major axis recovered from the mean motion (km).
    pub fn semi_major_axis_km(&self) -> f64 {
        let n_rad_s = self.mean_motion_rev_day * std::f64::consts::TAU / SECONDS_PER_DAY;
        (MU_EARTH_KM3_S2 / (n_rad_s * n_rad_s)).cbrt()
    }

    pub fn perigee_radius_km(&self) -> f64 {
        self.semi_major_axis_km() * (1.0 - self.eccentricity)
    }

    pub fn apogee_radius_km(&self) -> f64 {
        self.semi_major_axis_km() * (1.0 + self.eccentricity)
    }

    /// Orbital period >= 225 minutes selects the deep-space branch.
    pub fn is_deep_space(&self) -> bool {
        self.period_minutes() >= DEEP_SPACE_PERIOD_MIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    Satellite,
    Debris,
}

/// Catalog naming convention: fragmentation debris carries a " DEB" suffix
/// and spent upper stages "R/B".
pub fn classify_name(name: &str) -> ObjectClass {
    let upper = name.to_ascii_uppercase();
    if upper.contains(" DEB") || upper.contains("R/B") {
        ObjectClass::Debris
    } else {
        ObjectClass::Satellite
    }
}

/// One cataloged object: identity plus the element set valid for its epoch.
/// A fresh TLE for the same catalog number supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub name: String,
    pub class: ObjectClass,
    pub elements: OrbitalElementSet,
}

impl TrackedObject {
    pub fn new(name: impl Into<String>, class: ObjectClass, elements: OrbitalElementSet) -> Self {
        Self {
            name: name.into(),
            class,
            elements,
        }
    }

    pub fn catalog_number(&self) -> u32 {
        self.elements.catalog_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debris_and_rocket_bodies_classify_as_debris() {
        assert_eq!(classify_name("COSMOS 2251 DEB"), ObjectClass::Debris);
        assert_eq!(classify_name("SL-16 R/B"), ObjectClass::Debris);
        assert_eq!(classify_name("ISS (ZARYA)"), ObjectClass::Satellite);
        assert_eq!(classify_name("STARLINK-1234"), ObjectClass::Satellite);
    }
}

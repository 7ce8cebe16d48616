use chrono::{DateTime, Utc};
use serde::Serialize;

/// Propagated physical state at one instant. Position and velocity are in
/// the TEME inertial frame; the geodetic fields are derived from them.
/// Cheap to recompute, never cached by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub timestamp: DateTime<Utc>,
    /// ECI position (km).
    pub position_km: [f64; 3],
    /// ECI velocity (km/s).
    pub velocity_km_s: [f64; 3],
    pub latitude_deg: f64,
    /// Wrapped to [-180, 180).
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl StateVector {
    pub fn radius_km(&self) -> f64 {
        let [x, y, z] = self.position_km;
        (x * x + y * y + z * z).sqrt()
    }

    pub fn speed_km_s(&self) -> f64 {
        let [x, y, z] = self.velocity_km_s;
        (x * x + y * y + z * z).sqrt()
    }

    /// Euclidean separation from another state (km).
    pub fn separation_km(&self, other: &StateVector) -> f64 {
        let dx = self.position_km[0] - other.position_km[0];
        let dy = self.position_km[1] - other.position_km[1];
        let dz = self.position_km[2] - other.position_km[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn relative_speed_km_s(&self, other: &StateVector) -> f64 {
        let dx = self.velocity_km_s[0] - other.velocity_km_s[0];
        let dy = self.velocity_km_s[1] - other.velocity_km_s[1];
        let dz = self.velocity_km_s[2] - other.velocity_km_s[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

mod constants;
mod error;
mod geodetic;
mod sgp4;
mod types;

pub use constants::*;
pub use error::PropagationError;
pub use geodetic::{ecef_to_geodetic, gmst_rad, julian_date, teme_to_ecef, wrap_longitude_deg};
pub use sgp4::{normalize_angle, propagate, sample_track};
pub use types::StateVector;

mod scorer;
mod screening;
mod types;

pub use scorer::{assess_conjunction, collision_probability, HARD_BODY_CUTOFF_RATIO};
pub use screening::{
    object_radius_km, screen_catalog, screen_pair, ScreeningFailure, ScreeningOutcome,
    ScreeningWindow,
};
pub use types::{ConjunctionEvent, RiskLevel};

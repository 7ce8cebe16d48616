mod evaluator;
mod types;

pub use evaluator::{estimated_decay_years, evaluate, DEFAULT_BALLISTIC_COEFFICIENT};
pub use types::{ComplianceRecord, ComplianceStatus, DesignMetadata, Requirement};

mod batch;
mod report;

pub use batch::{propagate_batch, BatchFailure, BatchOutcome};
pub use report::{assess, RiskAssessment};

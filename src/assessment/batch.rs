use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::propagation::{propagate, PropagationError, StateVector};
use crate::tle::TrackedObject;

#[derive(Debug)]
pub struct BatchFailure {
    pub catalog_number: u32,
    pub error: PropagationError,
}

/// Per-object successes alongside per-object failures. A decayed or
/// diverging object never aborts the rest of the batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub states: Vec<(u32, StateVector)>,
    pub failures: Vec<BatchFailure>,
}

/// Propagate every object to `at` on the rayon pool.
pub fn propagate_batch(objects: &[TrackedObject], at: DateTime<Utc>) -> BatchOutcome {
    let results: Vec<_> = objects
        .par_iter()
        .map(|o| (o.catalog_number(), propagate(&o.elements, at)))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (catalog_number, result) in results {
        match result {
            Ok(state) => outcome.states.push((catalog_number, state)),
            Err(error) => {
                log::warn!("propagation failed for object {catalog_number}: {error}");
                outcome.failures.push(BatchFailure {
                    catalog_number,
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::{self, ObjectClass};
    use chrono::Duration;

    const ISS_L1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_L2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    #[test]
    fn one_decayed_object_does_not_abort_the_batch() {
        let base = tle::parse(ISS_L1, ISS_L2).unwrap();
        let mut objects = Vec::new();
        for i in 0..10u32 {
            let mut elements = base.clone();
            elements.catalog_number = 40_000 + i;
            if i == 4 {
                // Shift the epoch back and crank the drag so this one is
                // long gone by the batch time
                elements.epoch = base.epoch - Duration::days(10);
                elements.mean_motion_rev_day = 16.5;
                elements.bstar = 0.1;
            }
            objects.push(TrackedObject::new(
                format!("SAT {i}"),
                ObjectClass::Satellite,
                elements,
            ));
        }

        let outcome = propagate_batch(&objects, base.epoch + Duration::hours(1));
        assert_eq!(outcome.states.len(), 9);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].catalog_number, 40_004);
        assert!(outcome.failures[0].error.is_decayed());
    }
}

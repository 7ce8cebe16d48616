mod catalog;
mod error;
mod parsing;
mod types;

pub use catalog::{split_tle_groups, Catalog, IngestOutcome, RejectedTle};
pub use error::ParseError;
pub use parsing::{compute_checksum, parse, parse_lenient};
pub use types::{classify_name, ObjectClass, OrbitalElementSet, TrackedObject};

//! Deterministic satellite propagation and conjunction-risk engine.
//!
//! The boundary is two flat TLE text lines in and typed, serializable
//! records out: parse -> propagate -> screen / evaluate -> assess. There
//! is no network, storage, or UI surface in here; feeds, endpoints, and
//! persistence belong to the callers.

pub mod assessment;
pub mod compliance;
pub mod conjunction;
pub mod propagation;
pub mod tle;

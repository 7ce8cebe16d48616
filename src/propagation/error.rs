use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PropagationError {
    #[error("object {catalog_number} has decayed (computed altitude {altitude_km:.1} km)")]
    Decayed {
        catalog_number: u32,
        altitude_km: f64,
    },
    #[error(
        "Kepler iteration failed to converge for object {catalog_number} \
         (residual {residual:.3e} rad)"
    )]
    NumericDivergence { catalog_number: u32, residual: f64 },
}

impl PropagationError {
    pub fn is_decayed(&self) -> bool {
        matches!(self, PropagationError::Decayed { .. })
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkrError>;

#[derive(Debug, Error)]
pub enum SkrError {
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The minimizer did not converge at one sweep point. Recoverable.
    #[error("optimizer failure at L={length_km} km: {message}")]
    OptimizerFailure { length_km: f64, message: String },

    /// The objective came back NaN, infinite or negative. Recoverable.
    #[error("degenerate objective at L={length_km} km: {value}")]
    DegenerateObjective { length_km: f64, value: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkrError {
    /// True for the per-point failures a sweep skips over.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SkrError::OptimizerFailure { .. } | SkrError::DegenerateObjective { .. }
        )
    }
}

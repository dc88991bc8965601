//! Secret-key-rate evaluation.
//!
//! The driver only needs [`SecurityRateEvaluator`]; [`decoy::DecoyStateEvaluator`]
//! is the two-intensity finite-key bound shipped with the crate.

pub mod bounds;
pub mod decoy;

use crate::params::model::QkdParameters;

/// Achievable secret-key rate for one parameter snapshot.
///
/// Implementations must be pure and deterministic in the snapshot, and must
/// return a finite value `>= 0`: report an infeasible configuration as `0.0`,
/// never as a negative or NaN rate.
pub trait SecurityRateEvaluator {
    fn evaluate(&self, params: &QkdParameters) -> f64;
}

impl<F> SecurityRateEvaluator for F
where
    F: Fn(&QkdParameters) -> f64,
{
    fn evaluate(&self, params: &QkdParameters) -> f64 {
        self(params)
    }
}

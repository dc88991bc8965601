// crates/qkdskr-core/src/sweep/candidate.rs

use crate::error::Result;
use crate::params::model::QkdParameters;

/// The four transmitter settings the optimizer moves.
///
/// The same X-basis probability is used for Alice and Bob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Decoy intensity.
    pub mu_1: f64,
    /// Signal intensity.
    pub mu_2: f64,
    pub p_mu_1: f64,
    pub p_x: f64,
}

impl Candidate {
    pub fn new(mu_1: f64, mu_2: f64, p_mu_1: f64, p_x: f64) -> Self {
        Self { mu_1, mu_2, p_mu_1, p_x }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.mu_1, self.mu_2, self.p_mu_1, self.p_x]
    }

    pub fn from_array(x: [f64; 4]) -> Self {
        Self::new(x[0], x[1], x[2], x[3])
    }

    /// Current settings of a model.
    pub fn from_parameters(p: &QkdParameters) -> Self {
        Self::new(p.mu_1(), p.mu_2(), p.p_mu_1(), p.p_x_alice())
    }
}

impl Default for Candidate {
    /// Starting guess for the first point of a sweep.
    fn default() -> Self {
        Self::new(0.5, 0.15, 0.5, 0.5)
    }
}

impl QkdParameters {
    /// Copy with the candidate's intensities and probabilities applied
    /// through the validating setters; `self` is unchanged.
    pub fn with_candidate(&self, c: &Candidate) -> Result<Self> {
        let mut p = self.clone();
        p.set_intensities(c.mu_1, c.mu_2)?;
        p.set_intensity_probability(c.p_mu_1)?;
        p.set_basis_probabilities(c.p_x, c.p_x)?;
        Ok(p)
    }
}

// crates/qkdskr-core/src/sweep/config.rs

use crate::error::{Result, SkrError};
use crate::optim::{Bounds, Constraint, MinimizeOptions};
use crate::sweep::candidate::Candidate;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConfig {
    /// First channel length, km.
    pub start_km: f64,
    /// Last channel length (inclusive), km.
    pub max_length_km: f64,
    pub step_km: f64,
    /// Start point at the first length.
    pub initial: Candidate,
    /// Required `mu_1 - mu_2`.
    pub decoy_margin: f64,
    /// Lower bound for both intensities.
    pub intensity_floor: f64,
    /// Probabilities are kept inside `[margin, 1 - margin]`.
    pub probability_margin: f64,
    pub options: MinimizeOptions,
    /// Also minimize from `initial` at every length and keep the better
    /// of the two results.
    pub cold_seed: bool,
    /// After the forward pass, walk the recorded points from the far end
    /// and re-seed each one from its successor's optimum when that scores
    /// higher. Recorded SKR then never increases with length for an
    /// evaluator that is monotone in length at a fixed candidate.
    pub refine_backward: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_km: 0.0,
            max_length_km: 280.0,
            step_km: 1.0,
            initial: Candidate::default(),
            decoy_margin: 1e-4,
            intensity_floor: 1e-5,
            probability_margin: 1e-5,
            options: MinimizeOptions::default(),
            cold_seed: true,
            refine_backward: true,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(SkrError::Configuration(msg));
        if !(self.start_km.is_finite() && self.start_km >= 0.0) {
            return bad(format!("sweep start must be >= 0 (got {})", self.start_km));
        }
        if !(self.max_length_km.is_finite() && self.max_length_km >= self.start_km) {
            return bad(format!(
                "sweep max length must be >= start (start={} max={})",
                self.start_km, self.max_length_km
            ));
        }
        if !(self.step_km.is_finite() && self.step_km > 0.0) {
            return bad(format!("sweep step must be > 0 (got {})", self.step_km));
        }
        if !(self.decoy_margin.is_finite() && self.decoy_margin > 0.0) {
            return bad(format!("decoy margin must be > 0 (got {})", self.decoy_margin));
        }
        if !(self.intensity_floor.is_finite() && self.intensity_floor > 0.0) {
            return bad(format!("intensity floor must be > 0 (got {})", self.intensity_floor));
        }
        if !(self.probability_margin > 0.0 && self.probability_margin < 0.5) {
            return bad(format!(
                "probability margin must be in (0, 0.5) (got {})",
                self.probability_margin
            ));
        }
        if self.options.max_iterations == 0 {
            return bad("max iterations must be > 0".into());
        }
        Ok(())
    }

    /// Ascending channel lengths `start, start + step, ..., <= max`.
    pub fn lengths(&self) -> Vec<f64> {
        let span = self.max_length_km - self.start_km;
        let count = (span / self.step_km + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|i| self.start_km + i as f64 * self.step_km)
            .collect()
    }

    /// Box for (mu_1, mu_2, P_mu_1, P_X). Intensities have no upper bound.
    pub fn bounds(&self) -> Bounds<4> {
        let lo = self.probability_margin;
        let hi = 1.0 - self.probability_margin;
        Bounds::new(
            [self.intensity_floor, self.intensity_floor, lo, lo],
            [None, None, Some(hi), Some(hi)],
        )
    }

    /// `mu_1 - mu_2 - margin >= 0`.
    pub fn constraints(&self) -> Vec<Constraint<4>> {
        let margin = self.decoy_margin;
        vec![Constraint::new("mu_1 - mu_2 >= decoy_margin", move |x: &[f64; 4]| {
            x[0] - x[1] - margin
        })]
    }
}

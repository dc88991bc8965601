// crates/qkdskr-core/src/sweep/series.rs

use crate::sample::SampleRegime;
use crate::sweep::candidate::Candidate;

/// One recorded point of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint {
    pub length_km: f64,
    /// `-10 log10(eta_sys)` at this length.
    pub attenuation_db: f64,
    /// Optimal secret-key rate, bits/s.
    pub skr: f64,
    pub optimum: Candidate,
    /// Replaced during the backward pass by a rerun seeded from the next
    /// recorded point's optimum.
    pub refined: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointOutcome {
    Recorded {
        optimum: Candidate,
        skr: f64,
        iterations: usize,
        evaluations: usize,
    },
    /// No result for this length; the warm start was not advanced.
    Skipped { reason: String },
}

/// What the driver did at one length, recorded or not.
#[derive(Clone, Debug, PartialEq)]
pub struct PointTrace {
    pub length_km: f64,
    /// Start point handed to the minimizer.
    pub start: Candidate,
    pub outcome: PointOutcome,
}

impl PointTrace {
    pub fn is_recorded(&self) -> bool {
        matches!(self.outcome, PointOutcome::Recorded { .. })
    }
}

/// Result of one sweep over channel length.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepSeries {
    /// Legend label, e.g. `N = 10^10`.
    pub label: String,
    pub regime: SampleRegime,
    /// Parameter-set id of the base model.
    pub params_id: String,
    /// Recorded points in ascending length; skipped lengths are absent.
    pub points: Vec<SweepPoint>,
    /// One entry per attempted length, as seen by the forward pass.
    pub trace: Vec<PointTrace>,
}

impl SweepSeries {
    /// `(attenuation_dB, SKR)` pairs for plotting.
    pub fn curve(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.attenuation_db, p.skr))
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.trace.iter().filter(|t| !t.is_recorded()).count()
    }
}

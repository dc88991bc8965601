//! Per-distance optimization of the transmitter settings.
//!
//! A sweep walks the channel length upwards, maximizes the key rate at each
//! length with a bounded constrained minimizer, and seeds every point with
//! the optimum of the last point that converged.

pub mod candidate;
pub mod config;
pub mod driver;
pub mod series;

pub use candidate::Candidate;
pub use config::SweepConfig;
pub use driver::{run_sample_sweep, SweepDriver, SweepState};
pub use series::{PointOutcome, PointTrace, SweepPoint, SweepSeries};

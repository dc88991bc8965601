pub mod error;
pub mod validate;

pub mod sample;
pub mod params;
pub mod rate;
pub mod optim;
pub mod sweep;

pub use crate::error::{Result, SkrError};
pub use crate::params::model::{ConcentrationMethod, QkdParameters};
pub use crate::rate::{decoy::DecoyStateEvaluator, SecurityRateEvaluator};
pub use crate::sample::{SampleAxis, SampleRegime, SampleSize};
pub use crate::sweep::{Candidate, SweepConfig, SweepDriver, SweepSeries};

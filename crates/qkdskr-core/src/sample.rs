// crates/qkdskr-core/src/sample.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SkrError};

/// Which sample-size variable enters the finite-key terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleAxis {
    /// The total number of pulses Alice sends is held fixed.
    FixedTotal,
    /// The number of sifted key-basis detections (the block) is held fixed.
    FixedBlock,
}

impl SampleAxis {
    /// `fix_alice = true` selects the fixed-total axis.
    pub fn from_fix_alice(fix_alice: bool) -> Self {
        if fix_alice {
            SampleAxis::FixedTotal
        } else {
            SampleAxis::FixedBlock
        }
    }

    pub fn fix_alice(self) -> bool {
        matches!(self, SampleAxis::FixedTotal)
    }

    /// Symbol used in series labels.
    pub fn symbol(self) -> &'static str {
        match self {
            SampleAxis::FixedTotal => "N",
            SampleAxis::FixedBlock => "N_block",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SampleAxis::FixedTotal => "total",
            SampleAxis::FixedBlock => "block",
        }
    }
}

/// A sample count, or the infinite-sample limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleSize {
    Finite(f64),
    /// Finite-key corrections are disabled entirely.
    Asymptotic,
}

impl SampleSize {
    /// `10^exp` pulses.
    pub fn from_exponent(exp: i32) -> Self {
        SampleSize::Finite(10f64.powi(exp))
    }

    pub fn is_asymptotic(self) -> bool {
        matches!(self, SampleSize::Asymptotic)
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            SampleSize::Finite(n) => Some(n),
            SampleSize::Asymptotic => None,
        }
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSize::Finite(n) => {
                let exp = n.log10();
                if exp.fract() == 0.0 && exp >= 0.0 {
                    write!(f, "10^{}", exp as i64)
                } else {
                    write!(f, "{n:e}")
                }
            }
            SampleSize::Asymptotic => write!(f, "inf"),
        }
    }
}

impl FromStr for SampleSize {
    type Err = SkrError;

    /// Accepts `inf` / `asymptotic`, plain numbers (`1e10`, `100000`) and
    /// powers of ten written as `10^8`.
    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("inf")
            || t.eq_ignore_ascii_case("infinity")
            || t.eq_ignore_ascii_case("asymptotic")
        {
            return Ok(SampleSize::Asymptotic);
        }
        let value = if let Some(exp) = t.strip_prefix("10^") {
            let e: i32 = exp
                .parse()
                .map_err(|_| SkrError::Configuration(format!("invalid sample size: {t}")))?;
            10f64.powi(e)
        } else {
            t.parse::<f64>()
                .map_err(|_| SkrError::Configuration(format!("invalid sample size: {t}")))?
        };
        if !(value.is_finite() && value > 0.0) {
            return Err(SkrError::Configuration(format!(
                "sample size must be finite and > 0 (got {t})"
            )));
        }
        Ok(SampleSize::Finite(value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRegime {
    pub axis: SampleAxis,
    pub size: SampleSize,
}

impl SampleRegime {
    pub fn new(axis: SampleAxis, size: SampleSize) -> Self {
        Self { axis, size }
    }

    /// Legend label, e.g. `N = 10^10`, `N_block = 10^6` or `N = inf`.
    /// The asymptotic limit is the same curve on either axis.
    pub fn label(&self) -> String {
        match self.size {
            SampleSize::Asymptotic => "N = inf".to_string(),
            size => format!("{} = {}", self.axis.symbol(), size),
        }
    }
}

use crate::error::{Result, SkrError};
use crate::params::model::QkdParameters;
use crate::sample::SampleSize;

fn config_err(msg: String) -> SkrError {
    SkrError::Configuration(msg)
}

/// `p` must lie strictly inside (0, 1).
pub fn open_probability(name: &str, p: f64) -> Result<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(config_err(format!("{name} must be in (0, 1) (got {p})")));
    }
    Ok(())
}

/// `p` must lie in [0, 1].
pub fn closed_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(config_err(format!("{name} must be in [0, 1] (got {p})")));
    }
    Ok(())
}

pub fn positive(name: &str, v: f64) -> Result<()> {
    if !(v.is_finite() && v > 0.0) {
        return Err(config_err(format!("{name} must be finite and > 0 (got {v})")));
    }
    Ok(())
}

pub fn non_negative(name: &str, v: f64) -> Result<()> {
    if !(v.is_finite() && v >= 0.0) {
        return Err(config_err(format!("{name} must be finite and >= 0 (got {v})")));
    }
    Ok(())
}

/// Decoy and signal intensities: both positive, decoy strictly above signal.
pub fn intensities(mu_1: f64, mu_2: f64) -> Result<()> {
    positive("mu_1", mu_1)?;
    positive("mu_2", mu_2)?;
    if mu_1 <= mu_2 {
        return Err(config_err(format!(
            "mu_1 must exceed mu_2 (got mu_1={mu_1} mu_2={mu_2})"
        )));
    }
    Ok(())
}

pub fn sample_size(size: SampleSize) -> Result<()> {
    match size {
        SampleSize::Finite(n) => positive("sample size", n),
        SampleSize::Asymptotic => Ok(()),
    }
}

/// Full check of every root field. Derived fields are not inspected; they
/// are recomputed by the model itself.
pub fn validate_parameters(p: &QkdParameters) -> Result<()> {
    open_probability("P_X_alice", p.p_x_alice())?;
    open_probability("P_X_bob", p.p_x_bob())?;

    intensities(p.mu_1(), p.mu_2())?;
    open_probability("P_mu_1", p.p_mu_1())?;

    positive("R_0", p.repetition_rate())?;
    positive("N", p.pulse_count())?;

    closed_probability("eta_bob", p.eta_bob())?;
    if p.eta_bob() == 0.0 {
        return Err(config_err("eta_bob must be > 0".into()));
    }
    non_negative("alpha", p.alpha())?;
    non_negative("L", p.channel_length())?;

    open_probability("epsilon_cor", p.epsilon_cor())?;
    open_probability("epsilon_sec", p.epsilon_sec())?;

    non_negative("DCR", p.dark_count_rate())?;
    closed_probability("P_err", p.p_err())?;

    sample_size(p.sample_regime().size)?;

    Ok(())
}

// crates/qkdskr-core/src/params/model.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SkrError};
use crate::params::record::ParameterRecord;
use crate::sample::{SampleAxis, SampleRegime, SampleSize};
use crate::validate;

/// Share of `epsilon_sec` given to each term of the security analysis.
pub const EPSILON_SPLIT: f64 = 15.0;

/// Concentration inequality used to turn observed counts into bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConcentrationMethod {
    Hoeffding,
    Azuma,
}

impl ConcentrationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConcentrationMethod::Hoeffding => "Hoeffding",
            ConcentrationMethod::Azuma => "Azuma",
        }
    }

    /// Case-insensitive lookup for command-line overrides.
    pub fn from_name_ignore_case(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("hoeffding") {
            Ok(ConcentrationMethod::Hoeffding)
        } else if s.eq_ignore_ascii_case("azuma") {
            Ok(ConcentrationMethod::Azuma)
        } else {
            Err(unknown_method(s))
        }
    }
}

impl fmt::Display for ConcentrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record values must be spelled exactly `Hoeffding` or `Azuma`.
impl FromStr for ConcentrationMethod {
    type Err = SkrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Hoeffding" => Ok(ConcentrationMethod::Hoeffding),
            "Azuma" => Ok(ConcentrationMethod::Azuma),
            _ => Err(unknown_method(s)),
        }
    }
}

fn unknown_method(s: &str) -> SkrError {
    SkrError::Configuration(format!(
        "concentration_inequalities_method must be \"Hoeffding\" or \"Azuma\" (got {s:?})"
    ))
}

/// Every knob of the decoy-state protocol plus the quantities derived from
/// them.
///
/// Fields are private: the only way to change a root value is through a
/// setter, and every setter recomputes the fields that depend on it before
/// returning. A setter that rejects its input leaves the model untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct QkdParameters {
    // basis choice
    p_x_alice: f64,
    p_z_alice: f64,
    p_x_bob: f64,
    p_z_bob: f64,

    // intensities
    mu_1: f64,
    mu_2: f64,
    p_mu_1: f64,
    p_mu_2: f64,

    // state preparation
    r_0: f64,
    n_total: f64,

    // attenuation
    eta_bob: f64,
    alpha: f64,
    length_km: f64,
    eta_ch: f64,
    eta_sys: f64,

    // security
    epsilon_cor: f64,
    epsilon_sec: f64,
    epsilon_0: f64,
    epsilon_1: f64,
    epsilon_2: f64,

    // detector
    dcr: f64,
    p_err: f64,

    method: ConcentrationMethod,
    regime: SampleRegime,
}

impl QkdParameters {
    /// Build from a complete record. Fails on an unknown method name or an
    /// out-of-range root value.
    pub fn from_record(record: &ParameterRecord) -> Result<Self> {
        let method: ConcentrationMethod = record.concentration_inequalities_method.parse()?;
        let p = Self::assemble(record, method);
        validate::validate_parameters(&p)?;
        Ok(p)
    }

    /// Lay out root fields and derive the rest. No range checks.
    pub(crate) fn assemble(r: &ParameterRecord, method: ConcentrationMethod) -> Self {
        let mut p = Self {
            p_x_alice: r.p_x_alice,
            p_z_alice: 1.0 - r.p_x_alice,
            p_x_bob: r.p_x_bob,
            p_z_bob: 1.0 - r.p_x_bob,
            mu_1: r.mu_1,
            mu_2: r.mu_2,
            p_mu_1: r.p_mu_1,
            p_mu_2: 1.0 - r.p_mu_1,
            r_0: r.r_0,
            n_total: r.n,
            eta_bob: r.eta_bob,
            alpha: r.alpha,
            length_km: r.l,
            eta_ch: 0.0,
            eta_sys: 0.0,
            epsilon_cor: r.epsilon_cor,
            epsilon_sec: r.epsilon_sec,
            epsilon_0: 0.0,
            epsilon_1: 0.0,
            epsilon_2: 0.0,
            dcr: r.dcr,
            p_err: r.p_err,
            method,
            regime: SampleRegime::new(SampleAxis::FixedTotal, SampleSize::Finite(r.n)),
        };
        p.recompute_channel();
        p.recompute_epsilons();
        p
    }

    fn recompute_channel(&mut self) {
        self.eta_ch = channel_transmittance(self.alpha, self.length_km);
        self.eta_sys = self.eta_ch * self.eta_bob;
    }

    fn recompute_epsilons(&mut self) {
        self.epsilon_0 = self.epsilon_sec / EPSILON_SPLIT;
        self.epsilon_1 = self.epsilon_0;
        self.epsilon_2 = self.epsilon_0;
    }

    // ---------- setters ----------

    /// Set the fiber length in km and refresh `eta_ch` / `eta_sys`.
    pub fn set_channel_length(&mut self, length_km: f64) -> Result<()> {
        validate::non_negative("L", length_km)?;
        self.length_km = length_km;
        self.recompute_channel();
        Ok(())
    }

    /// Fiber loss in dB/km.
    pub fn set_attenuation(&mut self, alpha: f64) -> Result<()> {
        validate::non_negative("alpha", alpha)?;
        self.alpha = alpha;
        self.recompute_channel();
        Ok(())
    }

    pub fn set_detector_efficiency(&mut self, eta_bob: f64) -> Result<()> {
        validate::closed_probability("eta_bob", eta_bob)?;
        if eta_bob == 0.0 {
            return Err(SkrError::Configuration("eta_bob must be > 0".into()));
        }
        self.eta_bob = eta_bob;
        self.recompute_channel();
        Ok(())
    }

    pub fn set_security_params(&mut self, epsilon_cor: f64, epsilon_sec: f64) -> Result<()> {
        validate::open_probability("epsilon_cor", epsilon_cor)?;
        validate::open_probability("epsilon_sec", epsilon_sec)?;
        self.epsilon_cor = epsilon_cor;
        self.epsilon_sec = epsilon_sec;
        self.recompute_epsilons();
        Ok(())
    }

    /// X-basis probabilities for both parties; the Z probabilities follow.
    pub fn set_basis_probabilities(&mut self, p_x_alice: f64, p_x_bob: f64) -> Result<()> {
        validate::open_probability("P_X_alice", p_x_alice)?;
        validate::open_probability("P_X_bob", p_x_bob)?;
        self.p_x_alice = p_x_alice;
        self.p_z_alice = 1.0 - p_x_alice;
        self.p_x_bob = p_x_bob;
        self.p_z_bob = 1.0 - p_x_bob;
        Ok(())
    }

    pub fn set_intensity_probability(&mut self, p_mu_1: f64) -> Result<()> {
        validate::open_probability("P_mu_1", p_mu_1)?;
        self.p_mu_1 = p_mu_1;
        self.p_mu_2 = 1.0 - p_mu_1;
        Ok(())
    }

    pub fn set_intensities(&mut self, mu_1: f64, mu_2: f64) -> Result<()> {
        validate::intensities(mu_1, mu_2)?;
        self.mu_1 = mu_1;
        self.mu_2 = mu_2;
        Ok(())
    }

    pub fn set_repetition_rate(&mut self, r_0: f64) -> Result<()> {
        validate::positive("R_0", r_0)?;
        self.r_0 = r_0;
        Ok(())
    }

    /// Total pulse count. On the fixed-total axis this is also the finite
    /// sample size.
    pub fn set_pulse_count(&mut self, n: f64) -> Result<()> {
        validate::positive("N", n)?;
        self.n_total = n;
        if self.regime.axis == SampleAxis::FixedTotal && !self.regime.size.is_asymptotic() {
            self.regime.size = SampleSize::Finite(n);
        }
        Ok(())
    }

    pub fn set_detector(&mut self, dcr: f64, p_err: f64) -> Result<()> {
        validate::non_negative("DCR", dcr)?;
        validate::closed_probability("P_err", p_err)?;
        self.dcr = dcr;
        self.p_err = p_err;
        Ok(())
    }

    pub fn set_concentration_method(&mut self, method: ConcentrationMethod) {
        self.method = method;
    }

    /// Select the sample axis and size. A finite size on the fixed-total
    /// axis also becomes `N`.
    pub fn set_sample_regime(&mut self, regime: SampleRegime) -> Result<()> {
        validate::sample_size(regime.size)?;
        if let (SampleAxis::FixedTotal, SampleSize::Finite(n)) = (regime.axis, regime.size) {
            self.n_total = n;
        }
        self.regime = regime;
        Ok(())
    }

    /// Copy with a different channel length; `self` is unchanged.
    pub fn with_channel_length(&self, length_km: f64) -> Result<Self> {
        let mut p = self.clone();
        p.set_channel_length(length_km)?;
        Ok(p)
    }

    // ---------- accessors ----------

    pub fn p_x_alice(&self) -> f64 {
        self.p_x_alice
    }
    pub fn p_z_alice(&self) -> f64 {
        self.p_z_alice
    }
    pub fn p_x_bob(&self) -> f64 {
        self.p_x_bob
    }
    pub fn p_z_bob(&self) -> f64 {
        self.p_z_bob
    }

    /// Decoy intensity.
    pub fn mu_1(&self) -> f64 {
        self.mu_1
    }
    /// Signal intensity.
    pub fn mu_2(&self) -> f64 {
        self.mu_2
    }
    pub fn p_mu_1(&self) -> f64 {
        self.p_mu_1
    }
    pub fn p_mu_2(&self) -> f64 {
        self.p_mu_2
    }

    /// Pulses per second (`R_0`).
    pub fn repetition_rate(&self) -> f64 {
        self.r_0
    }
    /// Pulses Alice sends (`N`).
    pub fn pulse_count(&self) -> f64 {
        self.n_total
    }

    pub fn eta_bob(&self) -> f64 {
        self.eta_bob
    }
    /// dB/km.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
    /// km.
    pub fn channel_length(&self) -> f64 {
        self.length_km
    }
    pub fn eta_ch(&self) -> f64 {
        self.eta_ch
    }
    pub fn eta_sys(&self) -> f64 {
        self.eta_sys
    }

    /// `-10 log10(eta_sys)`, the loss between Alice and Bob's detectors.
    pub fn attenuation_db(&self) -> f64 {
        eta_to_db(self.eta_sys)
    }

    pub fn epsilon_cor(&self) -> f64 {
        self.epsilon_cor
    }
    pub fn epsilon_sec(&self) -> f64 {
        self.epsilon_sec
    }
    pub fn epsilon_0(&self) -> f64 {
        self.epsilon_0
    }
    pub fn epsilon_1(&self) -> f64 {
        self.epsilon_1
    }
    pub fn epsilon_2(&self) -> f64 {
        self.epsilon_2
    }

    /// Hz.
    pub fn dark_count_rate(&self) -> f64 {
        self.dcr
    }
    pub fn p_err(&self) -> f64 {
        self.p_err
    }

    pub fn concentration_method(&self) -> ConcentrationMethod {
        self.method
    }

    pub fn sample_regime(&self) -> SampleRegime {
        self.regime
    }

    pub fn is_asymptotic(&self) -> bool {
        self.regime.size.is_asymptotic()
    }
}

impl Default for QkdParameters {
    fn default() -> Self {
        crate::params::defaults::default_parameters()
    }
}

/// `10^(-alpha * L / 10)`.
pub fn channel_transmittance(alpha: f64, length_km: f64) -> f64 {
    10f64.powf(-alpha * length_km / 10.0)
}

/// Transmittance to loss in dB (positive for eta < 1).
pub fn eta_to_db(eta: f64) -> f64 {
    -10.0 * eta.log10()
}

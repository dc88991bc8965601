// crates/qkdskr-core/src/params/defaults.rs

use crate::params::model::{ConcentrationMethod, QkdParameters};
use crate::params::record::ParameterRecord;

/// Built-in parameter set: a 625 MHz two-intensity link over 100 km of
/// 0.2 dB/km fiber with an ideal detector efficiency and 200 Hz dark counts.
pub fn default_record() -> ParameterRecord {
    ParameterRecord {
        // basis choice, biased towards X (the key basis)
        p_x_alice: 0.9,
        p_x_bob: 0.9,

        mu_1: 0.5,
        mu_2: 0.15,
        p_mu_1: 0.9,

        r_0: 625e6,
        n: 1e10,

        eta_bob: 1.0,
        alpha: 0.2,
        l: 100.0,

        epsilon_cor: 1e-12,
        epsilon_sec: 1e-12,

        dcr: 200.0,
        p_err: 0.01,

        concentration_inequalities_method: ConcentrationMethod::Hoeffding.as_str().to_string(),
    }
}

pub fn default_parameters() -> QkdParameters {
    QkdParameters::assemble(&default_record(), ConcentrationMethod::Hoeffding)
}

// crates/qkdskr-core/src/params/record.rs

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkrError};
use crate::params::model::QkdParameters;

/// Flat key/value form of the root parameters, as exchanged in JSON files.
///
/// Every key is required. Extra keys are ignored. Derived quantities
/// (`P_Z_*`, `P_mu_2`, `eta_ch`, `eta_sys`, `epsilon_0..2`) are never read
/// from a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(rename = "P_X_alice")]
    pub p_x_alice: f64,
    #[serde(rename = "P_X_bob")]
    pub p_x_bob: f64,

    pub mu_1: f64,
    pub mu_2: f64,
    #[serde(rename = "P_mu_1")]
    pub p_mu_1: f64,

    #[serde(rename = "R_0")]
    pub r_0: f64,
    #[serde(rename = "N")]
    pub n: f64,

    pub eta_bob: f64,
    pub alpha: f64,
    #[serde(rename = "L")]
    pub l: f64,

    pub epsilon_cor: f64,
    pub epsilon_sec: f64,

    #[serde(rename = "DCR")]
    pub dcr: f64,
    #[serde(rename = "P_err")]
    pub p_err: f64,

    pub concentration_inequalities_method: String,
}

impl ParameterRecord {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| SkrError::Configuration(format!("parameter record: {e}")))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| SkrError::Configuration(format!("parameter record: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SkrError::Configuration(format!("parameter record: {e}")))
    }

    pub fn into_parameters(self) -> Result<QkdParameters> {
        QkdParameters::from_record(&self)
    }
}

impl From<&QkdParameters> for ParameterRecord {
    fn from(p: &QkdParameters) -> Self {
        Self {
            p_x_alice: p.p_x_alice(),
            p_x_bob: p.p_x_bob(),
            mu_1: p.mu_1(),
            mu_2: p.mu_2(),
            p_mu_1: p.p_mu_1(),
            r_0: p.repetition_rate(),
            n: p.pulse_count(),
            eta_bob: p.eta_bob(),
            alpha: p.alpha(),
            l: p.channel_length(),
            epsilon_cor: p.epsilon_cor(),
            epsilon_sec: p.epsilon_sec(),
            dcr: p.dark_count_rate(),
            p_err: p.p_err(),
            concentration_inequalities_method: p.concentration_method().as_str().to_string(),
        }
    }
}

/// Read a JSON parameter file and build a model from it.
pub fn load_json(path: impl AsRef<Path>) -> Result<QkdParameters> {
    let bytes = std::fs::read(path.as_ref())?;
    ParameterRecord::from_json_slice(&bytes)?.into_parameters()
}

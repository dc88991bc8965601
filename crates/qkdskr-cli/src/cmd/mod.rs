// crates/qkdskr-cli/src/cmd/mod.rs

pub mod eval;
pub mod params;
pub mod sweep;

use clap::Args;
use qkdskr_core::ConcentrationMethod;
use qkdskr_core::QkdParameters;

use crate::io::params_file;

/// Parameter source and overrides shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// JSON parameter record (built-in defaults when omitted)
    #[arg(long)]
    pub params: Option<String>,

    /// Override the concentration inequality (Hoeffding|Azuma, any case)
    #[arg(long)]
    pub method: Option<String>,

    /// Override the fiber attenuation, dB/km
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Override the detector efficiency eta_bob
    #[arg(long)]
    pub eta_bob: Option<f64>,
}

impl ModelArgs {
    /// Load the record (or defaults) and apply overrides through the setters.
    pub fn load(&self) -> anyhow::Result<QkdParameters> {
        let mut p = match self.params.as_deref() {
            Some(path) => params_file::load(path)?,
            None => QkdParameters::default(),
        };
        if let Some(m) = self.method.as_deref() {
            p.set_concentration_method(ConcentrationMethod::from_name_ignore_case(m)?);
        }
        if let Some(alpha) = self.alpha {
            p.set_attenuation(alpha)?;
        }
        if let Some(eta_bob) = self.eta_bob {
            p.set_detector_efficiency(eta_bob)?;
        }
        Ok(p)
    }
}

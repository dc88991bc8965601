// crates/qkdskr-cli/src/io/params_file.rs

use anyhow::{Context, Result};
use qkdskr_core::params::ParameterRecord;
use qkdskr_core::QkdParameters;

/// Load a JSON parameter record and build the model.
pub fn load(path: &str) -> Result<QkdParameters> {
    let bytes = std::fs::read(path).with_context(|| format!("read params {path}"))?;
    let record =
        ParameterRecord::from_json_slice(&bytes).with_context(|| format!("parse params {path}"))?;
    let params = record
        .into_parameters()
        .with_context(|| format!("validate params {path}"))?;
    Ok(params)
}

/// Write the flat record for `params` as pretty JSON.
pub fn save(path: &str, params: &QkdParameters) -> Result<()> {
    let json = ParameterRecord::from(params).to_json_pretty()?;
    std::fs::write(path, json + "\n").with_context(|| format!("write params {path}"))?;
    Ok(())
}

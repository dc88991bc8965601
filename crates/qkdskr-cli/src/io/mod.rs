// crates/qkdskr-cli/src/io/mod.rs

pub mod params_file;
pub mod series;

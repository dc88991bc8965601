// crates/qkdskr-cli/src/io/series.rs

use std::io::Write;

use anyhow::{Context, Result};
use qkdskr_core::SweepSeries;
use serde::Serialize;

/// One output row: a recorded sweep point with its series context.
#[derive(Debug, Serialize)]
pub struct SeriesRow<'a> {
    pub label: &'a str,
    pub axis: &'a str,
    pub sample_size: String,
    pub params_id: &'a str,
    pub length_km: f64,
    pub attenuation_db: f64,
    pub skr: f64,
    pub mu_1: f64,
    pub mu_2: f64,
    pub p_mu_1: f64,
    pub p_x: f64,
    pub refined: bool,
}

pub fn rows(series: &SweepSeries) -> impl Iterator<Item = SeriesRow<'_>> {
    let sample_size = series.regime.size.to_string();
    series.points.iter().map(move |p| SeriesRow {
        label: &series.label,
        axis: series.regime.axis.as_str(),
        sample_size: sample_size.clone(),
        params_id: &series.params_id,
        length_km: p.length_km,
        attenuation_db: p.attenuation_db,
        skr: p.skr,
        mu_1: p.optimum.mu_1,
        mu_2: p.optimum.mu_2,
        p_mu_1: p.optimum.p_mu_1,
        p_x: p.optimum.p_x,
        refined: p.refined,
    })
}

/// One JSON object per recorded point.
pub fn write_jsonl<W: Write + ?Sized>(w: &mut W, all: &[SweepSeries]) -> Result<()> {
    for s in all {
        for row in rows(s) {
            serde_json::to_writer(&mut *w, &row).context("serialize sweep row")?;
            w.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub const CSV_HEADER: &str =
    "label,axis,sample_size,params_id,length_km,attenuation_db,skr,mu_1,mu_2,p_mu_1,p_x,refined";

pub fn write_csv<W: Write + ?Sized>(w: &mut W, all: &[SweepSeries]) -> Result<()> {
    writeln!(w, "{CSV_HEADER}")?;
    for s in all {
        for r in rows(s) {
            writeln!(
                w,
                "\"{}\",{},{},{},{},{},{},{},{},{},{},{}",
                r.label,
                r.axis,
                r.sample_size,
                r.params_id,
                r.length_km,
                r.attenuation_db,
                r.skr,
                r.mu_1,
                r.mu_2,
                r.p_mu_1,
                r.p_x,
                r.refined
            )?;
        }
    }
    Ok(())
}

/// Write to `path`, or stdout when `None`.
pub fn write_to<F>(path: Option<&str>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match path {
        Some(p) => {
            let file = std::fs::File::create(p).with_context(|| format!("create {p}"))?;
            let mut w = std::io::BufWriter::new(file);
            write(&mut w)?;
            w.flush().with_context(|| format!("flush {p}"))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            write(&mut w)?;
            w.flush()?;
        }
    }
    Ok(())
}

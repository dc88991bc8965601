// crates/qkdskr-cli/src/cmd/sweep.rs

use clap::{Args, ValueEnum};

use crate::cmd::ModelArgs;
use crate::io::series;
use qkdskr_core::sweep::run_sample_sweep;
use qkdskr_core::{DecoyStateEvaluator, SampleAxis, SampleSize, SweepConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AxisArg {
    /// Total pulses sent by Alice are fixed
    Total,
    /// Sifted key-basis block size is fixed
    Block,
}

impl From<AxisArg> for SampleAxis {
    fn from(a: AxisArg) -> Self {
        match a {
            AxisArg::Total => SampleAxis::FixedTotal,
            AxisArg::Block => SampleAxis::FixedBlock,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Csv,
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Which sample size is held fixed
    #[arg(long, value_enum, default_value_t = AxisArg::Total)]
    pub axis: AxisArg,

    /// Comma-separated sample sizes (e.g. 1e6,10^8,inf)
    #[arg(long, default_value = "1e6,1e8,1e10,1e12,inf")]
    pub sizes: String,

    /// First channel length, km
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,

    /// Last channel length (inclusive), km
    #[arg(long, default_value_t = 280.0)]
    pub max_length: f64,

    /// Channel length step, km
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,

    /// Required mu_1 - mu_2
    #[arg(long, default_value_t = 1e-4)]
    pub margin: f64,

    /// Minimizer iteration cap per point
    #[arg(long, default_value_t = 100_000)]
    pub max_iter: usize,

    /// Output path (stdout when omitted)
    #[arg(long)]
    pub out: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,
}

fn parse_sizes(s: &str) -> anyhow::Result<Vec<SampleSize>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        out.push(t.parse::<SampleSize>()?);
    }
    if out.is_empty() {
        anyhow::bail!("sizes list is empty");
    }
    Ok(out)
}

pub fn run(args: SweepArgs) -> anyhow::Result<()> {
    let base = args.model.load()?;
    let sizes = parse_sizes(&args.sizes)?;

    let mut config = SweepConfig {
        start_km: args.start,
        max_length_km: args.max_length,
        step_km: args.step,
        decoy_margin: args.margin,
        ..SweepConfig::default()
    };
    config.options.max_iterations = args.max_iter;
    config.validate()?;

    let evaluator = DecoyStateEvaluator::default();
    let all = run_sample_sweep(&base, &evaluator, args.axis.into(), &sizes, &config)?;

    series::write_to(args.out.as_deref(), |w| match args.format {
        OutputFormat::Jsonl => series::write_jsonl(w, &all),
        OutputFormat::Csv => series::write_csv(w, &all),
    })?;

    eprintln!("--- sweep ---");
    eprintln!("axis            = {}", SampleAxis::from(args.axis).as_str());
    eprintln!(
        "lengths_km      = {}..={} step {}",
        config.start_km, config.max_length_km, config.step_km
    );
    eprintln!("method          = {}", base.concentration_method());
    for s in &all {
        let best = s
            .points
            .iter()
            .map(|p| p.skr)
            .fold(0.0_f64, f64::max);
        eprintln!(
            "{:<16}recorded={} skipped={} max_skr={:.6e} params_id={}",
            s.label,
            s.points.len(),
            s.skipped(),
            best,
            s.params_id
        );
    }
    if let Some(out) = args.out.as_deref() {
        eprintln!("out             = {}", out);
    }

    Ok(())
}

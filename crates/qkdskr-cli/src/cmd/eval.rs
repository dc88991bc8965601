// crates/qkdskr-cli/src/cmd/eval.rs

use clap::Args;

use crate::cmd::sweep::AxisArg;
use crate::cmd::ModelArgs;
use qkdskr_core::{Candidate, DecoyStateEvaluator, SampleRegime, SampleSize};

#[derive(Args, Debug)]
pub struct EvalArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Channel length, km
    #[arg(long, default_value_t = 0.0)]
    pub length: f64,

    #[arg(long, value_enum, default_value_t = AxisArg::Total)]
    pub axis: AxisArg,

    /// Sample size on the chosen axis (N from the record when omitted)
    #[arg(long)]
    pub size: Option<String>,

    #[arg(long, default_value_t = 0.5)]
    pub mu_1: f64,

    #[arg(long, default_value_t = 0.15)]
    pub mu_2: f64,

    #[arg(long, default_value_t = 0.5)]
    pub p_mu_1: f64,

    /// X-basis probability, used for both Alice and Bob
    #[arg(long, default_value_t = 0.5)]
    pub p_x: f64,
}

pub fn run(args: EvalArgs) -> anyhow::Result<()> {
    let mut p = args.model.load()?;
    let size = match args.size.as_deref() {
        Some(s) => s.parse::<SampleSize>()?,
        None => SampleSize::Finite(p.pulse_count()),
    };
    p.set_sample_regime(SampleRegime::new(args.axis.into(), size))?;
    p.set_channel_length(args.length)?;

    let candidate = Candidate::new(args.mu_1, args.mu_2, args.p_mu_1, args.p_x);
    let snapshot = p.with_candidate(&candidate)?;

    let ev = DecoyStateEvaluator::default();
    eprintln!("--- eval ---");
    eprintln!("regime          = {}", snapshot.sample_regime().label());
    eprintln!("L               = {} km", snapshot.channel_length());
    eprintln!("attenuation_db  = {:.4}", snapshot.attenuation_db());
    eprintln!(
        "candidate       = mu_1={} mu_2={} P_mu_1={} P_X={}",
        candidate.mu_1, candidate.mu_2, candidate.p_mu_1, candidate.p_x
    );

    match ev.breakdown(&snapshot) {
        Some(b) => {
            eprintln!("total_pulses    = {:.6e}", b.total_pulses);
            eprintln!("n_X, m_X        = {:.6e}, {:.6e}", b.x.detections, b.x.errors);
            eprintln!("n_Z, m_Z        = {:.6e}, {:.6e}", b.z.detections, b.z.errors);
            eprintln!("s_X0, s_X1      = {:.6e}, {:.6e}", b.x.vacuum_lower, b.x.single_photon);
            eprintln!("s_Z1, v_Z1      = {:.6e}, {:.6e}", b.z.single_photon, b.z.single_photon_errors);
            eprintln!("qber_X          = {:.6}", b.qber_x);
            eprintln!("phase_error_X   = {:.6}", b.phase_error_x);
            eprintln!("leak_EC         = {:.6e}", b.leak_ec);
            eprintln!("key_length      = {:.6e}", b.key_length);
            println!("{:e}", b.rate);
        }
        None => {
            eprintln!("no key: bounds degenerate at this point");
            println!("{:e}", 0.0);
        }
    }

    Ok(())
}

// crates/qkdskr-cli/src/cmd/params.rs

use clap::Args;

use crate::cmd::ModelArgs;
use crate::io::params_file;
use qkdskr_core::params::format::params_id_hex;

#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Channel length to report derived fields at, km
    #[arg(long)]
    pub length: Option<f64>,

    /// Write the (possibly overridden) record as JSON to this path
    #[arg(long)]
    pub dump_json: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let mut p = args.model.load()?;
    if let Some(l) = args.length {
        p.set_channel_length(l)?;
    }

    eprintln!("--- params ---");
    eprintln!("source          = {}", args.model.params.as_deref().unwrap_or("<defaults>"));
    eprintln!("params_id       = {}", params_id_hex(&p));
    eprintln!("P_X_alice       = {}  (P_Z_alice = {})", p.p_x_alice(), p.p_z_alice());
    eprintln!("P_X_bob         = {}  (P_Z_bob = {})", p.p_x_bob(), p.p_z_bob());
    eprintln!("mu_1, mu_2      = {}, {}", p.mu_1(), p.mu_2());
    eprintln!("P_mu_1          = {}  (P_mu_2 = {})", p.p_mu_1(), p.p_mu_2());
    eprintln!("R_0             = {:e} Hz", p.repetition_rate());
    eprintln!("N               = {:e}", p.pulse_count());
    eprintln!("regime          = {}", p.sample_regime().label());
    eprintln!("DCR             = {} Hz", p.dark_count_rate());
    eprintln!("P_err           = {}", p.p_err());
    eprintln!("method          = {}", p.concentration_method());

    eprintln!("--- channel ---");
    eprintln!("L               = {} km", p.channel_length());
    eprintln!("alpha           = {} dB/km", p.alpha());
    eprintln!("eta_bob         = {}", p.eta_bob());
    eprintln!("eta_ch          = {:.6e}", p.eta_ch());
    eprintln!("eta_sys         = {:.6e}", p.eta_sys());
    eprintln!("attenuation_db  = {:.4}", p.attenuation_db());

    eprintln!("--- security ---");
    eprintln!("epsilon_cor     = {:e}", p.epsilon_cor());
    eprintln!("epsilon_sec     = {:e}", p.epsilon_sec());
    eprintln!("epsilon_0       = {:e}", p.epsilon_0());
    eprintln!("epsilon_1       = {:e}", p.epsilon_1());
    eprintln!("epsilon_2       = {:e}", p.epsilon_2());

    if let Some(out) = args.dump_json.as_deref() {
        params_file::save(out, &p)?;
        eprintln!("dump_json       = {}", out);
    }

    Ok(())
}

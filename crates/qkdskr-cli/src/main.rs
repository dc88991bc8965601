// crates/qkdskr-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;
mod logging;

#[derive(Parser)]
#[command(name = "qkdskr-cli")]
#[command(about = "Decoy-state QKD secret-key-rate optimizer", long_about = None)]
pub struct Cli {
    /// Debug-level logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable ANSI colors in log output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Optimize the key rate over channel length for a list of sample sizes
    Sweep(cmd::sweep::SweepArgs),

    /// Print a parameter set and its derived fields
    Params(cmd::params::ParamsArgs),

    /// Evaluate one candidate at one channel length
    Eval(cmd::eval::EvalArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(
        logging::Verbosity::from_flags(cli.verbose, cli.quiet),
        cli.no_color,
    );

    match cli.cmd {
        Commands::Sweep(args) => cmd::sweep::run(args),
        Commands::Params(args) => cmd::params::run(args),
        Commands::Eval(args) => cmd::eval::run(args),
    }
}

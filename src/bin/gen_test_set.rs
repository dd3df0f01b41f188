//! Write the integers `1..=n^k` in shuffled order, one per line

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::error;

use layered_rank::generate::{generate, save_values};
use layered_rank::logging::init_tracing;
use layered_rank::Error;

const LOG_TARGET: &str = "bin::gen_test_set";

#[derive(Debug, Parser)]
#[command(name = "gen_test_set")]
#[command(version, about = "Generate a shuffled test set for layered_rank", long_about = None)]
struct Args {
    /// The base number n
    #[arg(short, long)]
    n: u32,

    /// The exponent k
    #[arg(short, long)]
    k: u32,

    /// Output file
    #[arg(long, default_value = "test_set.csv")]
    out: PathBuf,

    /// Optional RNG seed for a reproducible shuffle
    #[arg(long, env = "GEN_TEST_SET_SEED")]
    seed: Option<u64>,

    /// Push every value through ceil(k * log2(n)) encoding layers
    #[arg(long)]
    encode: bool,

    /// Toggle structured (JSON) logs on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(err) = init_tracing(args.log_json) {
        eprintln!("failed to initialise logging: {err:#}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
            error!(target = LOG_TARGET, error = %format!("{err:#}"), code, "generation failed");
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut rng = args
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);

    let values = generate(args.n, args.k, args.encode, &mut rng)
        .with_context(|| format!("failed to generate {}^{} values", args.n, args.k))?;
    save_values(&args.out, &values)
        .with_context(|| format!("failed to save {}", args.out.display()))?;

    println!(
        "File saved with {} values in '{}'",
        values.len(),
        args.out.display()
    );
    Ok(())
}

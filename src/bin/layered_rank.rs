//! Invert the minimum (or maximum) value of an input file through its encoding layers

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::error;

use layered_rank::config::RunConfig;
use layered_rank::driver;
use layered_rank::engine::{RoundingPolicy, DEFAULT_SNAP_EPSILON};
use layered_rank::input::{MalformedPolicy, RecordLayout, Selection};
use layered_rank::logging::init_tracing;
use layered_rank::Error;

const LOG_TARGET: &str = "bin::layered_rank";

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum RoundingMode {
    /// Snap to the nearest integer within --epsilon, otherwise truncate
    Snap,
    /// Always truncate toward zero
    Truncate,
}

#[derive(Debug, Parser)]
#[command(name = "layered_rank")]
#[command(version, long_about = None)]
#[command(about = "Recover the permutation behind a layered-encoded value")]
struct Args {
    /// Total number of elements
    #[arg(short, long, env = "LAYERED_RANK_N")]
    n: u32,

    /// Number of elements in the permutation
    #[arg(short, long, env = "LAYERED_RANK_K")]
    k: u32,

    /// Path to the input file, one integer per line
    #[arg(long, env = "LAYERED_RANK_INPUT")]
    csv: PathBuf,

    /// Which value of the input to invert
    #[arg(long, value_enum, env = "LAYERED_RANK_SELECT", default_value_t = Selection::Min)]
    select: Selection,

    /// Policy for lines that do not parse as an integer
    #[arg(
        long,
        value_enum,
        env = "LAYERED_RANK_ON_MALFORMED",
        default_value_t = MalformedPolicy::Fail
    )]
    on_malformed: MalformedPolicy,

    /// Zero-based comma-separated field holding the value
    #[arg(long, default_value_t = 0)]
    column: usize,

    /// Skip the first line of the input
    #[arg(long)]
    header: bool,

    /// How each decoded layer is turned back into an integer
    #[arg(long, value_enum, default_value_t = RoundingMode::Snap)]
    rounding: RoundingMode,

    /// Snap distance used by --rounding snap
    #[arg(long, default_value_t = DEFAULT_SNAP_EPSILON)]
    epsilon: f64,

    /// Print the recovered permutation and per-layer timings
    #[arg(long)]
    report: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "report")]
    json: bool,

    /// Toggle structured (JSON) logs on stderr
    #[arg(long, env = "LAYERED_RANK_LOG_JSON", default_value_t = false)]
    log_json: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let rounding = match self.rounding {
            RoundingMode::Snap => RoundingPolicy::Snap {
                epsilon: self.epsilon,
            },
            RoundingMode::Truncate => RoundingPolicy::Truncate,
        };

        RunConfig {
            n: self.n,
            k: self.k,
            input: self.csv.clone(),
            selection: self.select,
            malformed: self.on_malformed,
            layout: RecordLayout {
                column: self.column,
                has_header: self.header,
            },
            rounding,
        }
    }
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
            error!(target = LOG_TARGET, error = %format!("{err:#}"), code, "run failed");
            eprintln!("error: {err:#}");
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.run_config();
    let report = driver::run(&config)
        .with_context(|| format!("failed to invert values from {}", config.input.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if args.json {
        report.write_json(&mut out)
    } else if args.report {
        report.write_detailed(&mut out)
    } else {
        report.write_summary(&mut out)
    };
    written.context("failed to write report")?;
    out.flush().context("failed to flush stdout")?;

    Ok(())
}

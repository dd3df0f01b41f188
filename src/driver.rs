//! Load values, pick one, invert it, report

use std::time::Instant;

use tracing::info;

use crate::config::RunConfig;
use crate::engine::{invert_with, LayerTimings};
use crate::error::Error;
use crate::input::{load_values, select, LoadedValues};
use crate::report::Report;

const LOG_TARGET: &str = "layered_rank::driver";

/// Run the full pipeline for `config`, reading the input file it names.
pub fn run(config: &RunConfig) -> Result<Report, Error> {
    let layer_depth = config.validate()?;
    let loaded = load_values(&config.input, config.layout, config.malformed)?;
    run_loaded(config, layer_depth, loaded)
}

/// Run the pipeline on values that are already loaded.
///
/// An empty set is rejected before the engine is touched.
pub fn run_loaded(
    config: &RunConfig,
    layer_depth: u32,
    loaded: LoadedValues,
) -> Result<Report, Error> {
    let input = config.input.display().to_string();
    if loaded.values.is_empty() {
        return Err(Error::EmptyInput { input });
    }

    let mut timings = LayerTimings::new();
    let start = Instant::now();

    let (selected_index, selected_value) = select(&loaded.values, config.selection)
        .ok_or_else(|| Error::EmptyInput {
            input: input.clone(),
        })?;
    let inversion = invert_with(
        selected_value,
        layer_depth,
        config.n,
        config.k,
        config.rounding,
        &mut timings,
    )?;

    let total_elapsed_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    info!(
        target = LOG_TARGET,
        %input,
        selected_value,
        rank = inversion.rank,
        layer_depth,
        total_elapsed_ns,
        "inverted selected value"
    );

    Ok(Report {
        input,
        n: config.n,
        k: config.k,
        layer_depth,
        selection: config.selection,
        rounding: config.rounding,
        records: loaded.values.len(),
        skipped: loaded.skipped,
        selected_index,
        selected_value,
        rank: inversion.rank,
        permutation: inversion.permutation,
        total_elapsed_ns,
        layers: timings.into_records(),
    })
}

//! Tracing setup shared by the binaries

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter applied when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Install a global subscriber writing to stderr, so stdout carries only the report.
///
/// `json` switches to flattened JSON events.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder
            .json()
            .flatten_event(true)
            .try_init()
            .map_err(|err| anyhow!(err))
    } else {
        builder.compact().try_init().map_err(|err| anyhow!(err))
    }
}

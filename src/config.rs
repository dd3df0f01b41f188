//! Run configuration shared by the binaries

use std::path::PathBuf;

use crate::engine::RoundingPolicy;
use crate::error::Error;
use crate::input::{MalformedPolicy, RecordLayout, Selection};

/// Number of encoding layers for a `k`-permutation of `n` elements: `ceil(k * log2(n))`
pub fn layer_depth(n: u32, k: u32) -> Result<u32, Error> {
    if n == 0 {
        return Err(Error::config("n must be at least 1"));
    }

    let depth = (f64::from(k) * f64::from(n).log2()).ceil();
    if depth > f64::from(u32::MAX) {
        return Err(Error::config(format!(
            "layer depth for n={n}, k={k} does not fit in u32"
        )));
    }

    Ok(depth as u32)
}

/// Everything the driver needs for one invocation
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Total population size
    pub n: u32,
    /// Permutation length
    pub k: u32,
    /// Input source, one record per line
    pub input: PathBuf,
    pub selection: Selection,
    pub malformed: MalformedPolicy,
    pub layout: RecordLayout,
    pub rounding: RoundingPolicy,
}

impl RunConfig {
    pub fn new(n: u32, k: u32, input: impl Into<PathBuf>) -> Self {
        Self {
            n,
            k,
            input: input.into(),
            selection: Selection::default(),
            malformed: MalformedPolicy::default(),
            layout: RecordLayout::default(),
            rounding: RoundingPolicy::default(),
        }
    }

    /// Check the configuration and derive the layer depth.
    pub fn validate(&self) -> Result<u32, Error> {
        if self.k > self.n {
            return Err(Error::config(format!(
                "k ({}) must not exceed n ({})",
                self.k, self.n
            )));
        }

        if let RoundingPolicy::Snap { epsilon } = self.rounding {
            if !epsilon.is_finite() || !(0.0..0.5).contains(&epsilon) {
                return Err(Error::config(format!(
                    "snap epsilon must be in [0, 0.5), got {epsilon}"
                )));
            }
        }

        layer_depth(self.n, self.k)
    }
}

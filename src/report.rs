//! Driver output: plain summary, per-layer detail, JSON

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::engine::{LayerRecord, RoundingPolicy};
use crate::input::Selection;
use crate::permutation::Permutation;

/// Outcome of one driver run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub input: String,
    pub n: u32,
    pub k: u32,
    pub layer_depth: u32,
    pub selection: Selection,
    pub rounding: RoundingPolicy,
    /// Number of values loaded
    pub records: usize,
    /// Malformed records skipped while loading
    pub skipped: usize,
    pub selected_index: usize,
    pub selected_value: i64,
    /// Rank recovered after stripping every layer
    pub rank: i64,
    pub permutation: Permutation,
    /// Selection plus inversion, in nanoseconds
    pub total_elapsed_ns: u64,
    pub layers: Vec<LayerRecord>,
}

impl Report {
    /// Sum of the per-layer timings
    pub fn layer_elapsed_ns(&self) -> u64 {
        self.layers.iter().map(|layer| layer.elapsed_ns).sum()
    }

    pub fn layer_footprint_bytes(&self) -> usize {
        self.layers.iter().map(|layer| layer.footprint_bytes).sum()
    }

    /// The selected value on one line, total elapsed time on the next.
    pub fn write_summary<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.selected_value)?;
        writeln!(out, "{} ns", self.total_elapsed_ns)
    }

    /// Summary followed by the recovered permutation and one entry per layer.
    pub fn write_detailed<W: Write>(&self, mut out: W) -> io::Result<()> {
        self.write_summary(&mut out)?;
        writeln!(out)?;
        writeln!(out, "Input: {} ({} values, {} skipped)", self.input, self.records, self.skipped)?;
        writeln!(
            out,
            "Selected ({:?}): {} at index {}",
            self.selection, self.selected_value, self.selected_index
        )?;
        writeln!(out, "n = {}, k = {}, layers = {}", self.n, self.k, self.layer_depth)?;
        writeln!(out, "Recovered rank: {}", self.rank)?;
        writeln!(out, "Permutation: {}", self.permutation)?;
        writeln!(out, "Total layer timing: {} ns", self.layer_elapsed_ns())?;
        writeln!(out, "Total layer footprint: {} bytes", self.layer_footprint_bytes())?;

        for layer in &self.layers {
            writeln!(
                out,
                "  layer {:>4}: {} -> {} ({} ns, {} bytes)",
                layer.layer, layer.input, layer.output, layer.elapsed_ns, layer.footprint_bytes
            )?;
        }

        Ok(())
    }

    pub fn write_json<W: Write>(&self, mut out: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)
    }
}

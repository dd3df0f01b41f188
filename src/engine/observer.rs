//! Per-layer instrumentation hooks for the inversion loop

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// What the engine reports after stripping one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStep {
    /// Layer that was removed (counts down from the configured depth to 1)
    pub layer: u32,
    /// Value entering the layer
    pub input: i64,
    /// Real-valued result of the layer decode, before rounding
    pub decoded: f64,
    /// Integer value handed to the next layer
    pub output: i64,
    /// Storage held by the intermediate handed to the next layer
    pub footprint_bytes: usize,
}

/// Observer invoked around every layer of [`super::invert_with`].
///
/// Both hooks default to no-ops. Observers cannot influence the decoded result.
pub trait LayerObserver {
    fn layer_started(&mut self, _layer: u32) {}

    fn layer_finished(&mut self, _step: &LayerStep) {}
}

impl<O: LayerObserver + ?Sized> LayerObserver for &mut O {
    fn layer_started(&mut self, layer: u32) {
        (**self).layer_started(layer)
    }

    fn layer_finished(&mut self, step: &LayerStep) {
        (**self).layer_finished(step)
    }
}

/// Observer that records nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl LayerObserver for NoopObserver {}

/// Timing and footprint for one stripped layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub layer: u32,
    pub input: i64,
    pub decoded: f64,
    pub output: i64,
    pub elapsed_ns: u64,
    pub footprint_bytes: usize,
}

/// Collects a [`LayerRecord`] per layer, timing each one with a monotonic clock.
#[derive(Debug, Default)]
pub struct LayerTimings {
    pending: Option<Instant>,
    records: Vec<LayerRecord>,
}

impl LayerTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in the order the layers were stripped (outermost first)
    pub fn records(&self) -> &[LayerRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LayerRecord> {
        self.records
    }
}

impl LayerObserver for LayerTimings {
    fn layer_started(&mut self, _layer: u32) {
        self.pending = Some(Instant::now());
    }

    fn layer_finished(&mut self, step: &LayerStep) {
        let elapsed = self
            .pending
            .take()
            .map(|start| start.elapsed())
            .unwrap_or_default();

        self.records.push(LayerRecord {
            layer: step.layer,
            input: step.input,
            decoded: step.decoded,
            output: step.output,
            elapsed_ns: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            footprint_bytes: step.footprint_bytes,
        });
    }
}

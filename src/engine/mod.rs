//! Layered inversion engine
//!
//! Strips `layer_depth` encoding layers off an observed value, outermost layer
//! first, then expands the recovered rank into its permutation digits. The
//! forward direction ([`encode_chain`]) is provided so the two can be checked
//! against each other.

pub mod error;
pub mod observer;

pub use error::InvertError;
pub use observer::{LayerObserver, LayerRecord, LayerStep, LayerTimings, NoopObserver};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codec::{decode_layer, encode_layer, MAX_EXACT_INTEGER};
use crate::permutation::{rank_to_permutation, Permutation};

const LOG_TARGET: &str = "layered_rank::engine";

/// Largest input magnitude a layer converts to f64 without rounding
const MAX_EXACT_MAGNITUDE: u64 = 1 << 53;

/// Default distance within which an intermediate snaps to the nearest integer
pub const DEFAULT_SNAP_EPSILON: f64 = 1e-6;

/// How a real-valued layer result becomes the next integer value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Truncate toward zero
    Truncate,
    /// Take the nearest integer when within `epsilon` of it, otherwise truncate toward zero
    Snap { epsilon: f64 },
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy::Snap {
            epsilon: DEFAULT_SNAP_EPSILON,
        }
    }
}

impl RoundingPolicy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingPolicy::Truncate => value.trunc(),
            RoundingPolicy::Snap { epsilon } => {
                let nearest = value.round();
                if (value - nearest).abs() <= epsilon {
                    nearest
                } else {
                    value.trunc()
                }
            }
        }
    }
}

fn to_rank(layer: u32, value: f64) -> Result<i64, InvertError> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(InvertError::NonRepresentable { layer, value });
    }
    Ok(value as i64)
}

/// Strip `layer_depth` layers off `value` and return the underlying rank.
///
/// Layers are removed from `layer_depth` down to 1; each one decodes at depth 1,
/// removes the `layer / 2` offset and rounds according to `rounding`.
#[tracing::instrument(target = LOG_TARGET, level = "debug", skip(observer))]
pub fn recover_rank<O: LayerObserver>(
    value: i64,
    layer_depth: u32,
    rounding: RoundingPolicy,
    mut observer: O,
) -> Result<i64, InvertError> {
    let mut value = value;

    for layer in (1..=layer_depth).rev() {
        if value.unsigned_abs() > MAX_EXACT_MAGNITUDE {
            return Err(InvertError::Inexact { layer, value });
        }

        observer.layer_started(layer);

        let decoded = decode_layer(value as f64, layer);
        let next = to_rank(layer, rounding.apply(decoded))?;

        trace!(
            target = LOG_TARGET,
            layer,
            input = value,
            decoded,
            output = next,
            "stripped layer"
        );

        observer.layer_finished(&LayerStep {
            layer,
            input: value,
            decoded,
            output: next,
            footprint_bytes: std::mem::size_of_val(&next),
        });

        value = next;
    }

    Ok(value)
}

/// Result of a full inversion: the bare rank and its permutation digits
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inversion {
    pub rank: i64,
    pub permutation: Permutation,
}

/// Invert `value` through `layer_depth` layers and expand the result into a
/// `k`-permutation of `n` elements, reporting each layer to `observer`.
pub fn invert_with<O: LayerObserver>(
    value: i64,
    layer_depth: u32,
    n: u32,
    k: u32,
    rounding: RoundingPolicy,
    observer: O,
) -> Result<Inversion, InvertError> {
    let rank = recover_rank(value, layer_depth, rounding, observer)?;
    let permutation = rank_to_permutation(n, k, rank);
    debug!(
        target = LOG_TARGET,
        rank,
        %permutation,
        "recovered permutation"
    );
    Ok(Inversion { rank, permutation })
}

/// Invert with the default rounding policy and no instrumentation.
pub fn invert(value: i64, layer_depth: u32, n: u32, k: u32) -> Result<Permutation, InvertError> {
    invert_with(
        value,
        layer_depth,
        n,
        k,
        RoundingPolicy::default(),
        NoopObserver,
    )
    .map(|inversion| inversion.permutation)
}

/// Apply layers `1..=layer_depth` to `rank`, producing the value [`invert`] expects.
pub fn encode_chain(rank: i64, layer_depth: u32) -> Result<i64, InvertError> {
    let mut value = rank;
    for layer in 1..=layer_depth {
        let encoded = encode_layer(value as f64, layer);
        if !encoded.is_finite() || encoded.abs() > MAX_EXACT_INTEGER {
            return Err(InvertError::Overflow { layer, rank: value });
        }
        value = encoded as i64;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    #[test]
    fn test_scenario_five_choose_three() {
        let layer_depth = crate::config::layer_depth(5, 3).unwrap();
        assert_eq!(layer_depth, 7);

        let value = encode_chain(42, layer_depth).unwrap();
        let recovered = invert(value, layer_depth, 5, 3).unwrap();
        assert_eq!(recovered, rank_to_permutation(5, 3, 42));
        assert_eq!(recovered, Permutation(vec![0, 0, 3]));
    }

    #[test]
    fn test_chain_values() {
        assert_eq!(encode_chain(42, 0).unwrap(), 42);
        // 2*42 + 1 + 1
        assert_eq!(encode_chain(42, 1).unwrap(), 86);
        // 2*86 + 2 + 1
        assert_eq!(encode_chain(42, 2).unwrap(), 175);
    }

    #[test]
    fn test_base_case_is_direct_ranking() {
        for value in [-5, 0, 1, 42, 1_000_000] {
            assert_eq!(
                invert(value, 0, 5, 3).unwrap(),
                rank_to_permutation(5, 3, value)
            );
        }
    }

    #[test]
    fn test_recovers_rank_for_many_depths() {
        for layer_depth in 0..=32 {
            for rank in [0i64, 1, 2, 3, 42, 119, 4_095] {
                let value = encode_chain(rank, layer_depth).unwrap();
                let recovered =
                    recover_rank(value, layer_depth, RoundingPolicy::default(), NoopObserver)
                        .unwrap();
                assert_eq!(recovered, rank, "depth={layer_depth} rank={rank}");
            }
        }
    }

    #[test]
    fn test_plain_depth_one_chain_does_not_invert() {
        // Seven plain encode(_, 1) rounds omit the per-layer offset, so the
        // inversion lands elsewhere.
        let mut value = 42.0;
        for _ in 0..7 {
            value = encode(value, 1);
        }
        let recovered =
            recover_rank(value as i64, 7, RoundingPolicy::Truncate, NoopObserver).unwrap();
        assert_eq!(recovered, 40);
    }

    #[test]
    fn test_observer_sees_every_layer() {
        let value = encode_chain(42, 7).unwrap();
        let mut timings = LayerTimings::new();
        let recovered = invert_with(
            value,
            7,
            5,
            3,
            RoundingPolicy::default(),
            &mut timings,
        )
        .unwrap();
        assert_eq!(recovered.rank, 42);
        assert_eq!(recovered.permutation, invert(value, 7, 5, 3).unwrap());

        let records = timings.records();
        let layers: Vec<u32> = records.iter().map(|r| r.layer).collect();
        assert_eq!(layers, vec![7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(records[0].input, value);
        assert_eq!(records[6].output, 42);
        for pair in records.windows(2) {
            assert_eq!(pair[0].output, pair[1].input);
        }
        assert!(records.iter().all(|r| r.footprint_bytes == 8));
    }

    #[test]
    fn test_rounding_policies() {
        let snap = RoundingPolicy::default();
        assert_eq!(snap.apply(41.999_999_9), 42.0);
        assert_eq!(snap.apply(-2.000_000_1), -2.0);
        assert_eq!(snap.apply(2747.5), 2747.0);
        assert_eq!(snap.apply(-3.5), -3.0);

        assert_eq!(RoundingPolicy::Truncate.apply(41.999_999_9), 41.0);
        assert_eq!(RoundingPolicy::Truncate.apply(-3.5), -3.0);
    }

    #[test]
    fn test_rejects_unrepresentable_intermediate() {
        assert!(matches!(
            to_rank(3, f64::NAN),
            Err(InvertError::NonRepresentable { layer: 3, .. })
        ));
        assert!(matches!(
            to_rank(1, f64::INFINITY),
            Err(InvertError::NonRepresentable { layer: 1, .. })
        ));
        assert!(matches!(
            to_rank(2, 1e19),
            Err(InvertError::NonRepresentable { layer: 2, .. })
        ));
        assert_eq!(to_rank(1, -9.0e18).unwrap(), -9_000_000_000_000_000_000);
    }

    #[test]
    fn test_rejects_input_beyond_exact_range() {
        let value = (1i64 << 53) + 3;
        assert_eq!(
            recover_rank(value, 1, RoundingPolicy::Truncate, NoopObserver).unwrap_err(),
            InvertError::Inexact { layer: 1, value }
        );
        assert!(matches!(
            invert(-value, 4, 5, 3),
            Err(InvertError::Inexact { layer: 4, .. })
        ));

        // Exactly 2^53 is still representable; depth 0 never converts.
        assert!(recover_rank(1i64 << 53, 1, RoundingPolicy::Truncate, NoopObserver).is_ok());
        assert_eq!(invert(value, 0, 5, 3).unwrap(), rank_to_permutation(5, 3, value));
    }

    #[test]
    fn test_chain_overflow() {
        let err = encode_chain(1 << 50, 10).unwrap_err();
        assert!(matches!(err, InvertError::Overflow { .. }));
    }

    #[test]
    fn test_deterministic() {
        let value = encode_chain(1_234, 20).unwrap();
        let a = invert(value, 20, 10, 6).unwrap();
        let b = invert(value, 20, 10, 6).unwrap();
        assert_eq!(a, b);
    }
}

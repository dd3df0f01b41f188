//! Layered exponential-offset transform
//!
//! `encode(Y, D) = 2^D * (Y + D/2)` and its algebraic inverse
//! `decode(X, D) = X / 2^D - D/2`. All arithmetic is `f64`.
//!
//! Inside the layered pipeline the primitive is always called with `D = 1`;
//! the per-layer offset `layer / 2` is applied around it by [`encode_layer`]
//! and [`decode_layer`], which are exact inverses of each other for integer
//! ranks.
//!
//! For `D > 1023` the scale factor `2^D` is not finite and both functions
//! return `inf`/`0`; callers are expected to stay well below that.

/// Depth argument the layered pipeline passes to the primitive on every layer.
pub const LAYER_STEP_DEPTH: u32 = 1;

/// Largest magnitude below which every integer is exactly representable as `f64`.
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// Forward transform: `2^depth * (rank + depth / 2)`
#[inline]
pub fn encode(rank: f64, depth: u32) -> f64 {
    let depth = f64::from(depth);
    depth.exp2() * (rank + depth / 2.0)
}

/// Inverse transform: `value / 2^depth - depth / 2`
#[inline]
pub fn decode(value: f64, depth: u32) -> f64 {
    let depth = f64::from(depth);
    value / depth.exp2() - depth / 2.0
}

/// One forward layer of the pipeline: offset by `layer / 2`, then encode at depth 1.
///
/// For integer `rank` this equals `2 * rank + layer + 1`.
#[inline]
pub fn encode_layer(rank: f64, layer: u32) -> f64 {
    encode(rank + f64::from(layer) / 2.0, LAYER_STEP_DEPTH)
}

/// One inverse layer of the pipeline: decode at depth 1, then remove the `layer / 2` offset.
#[inline]
pub fn decode_layer(value: f64, layer: u32) -> f64 {
    decode(value, LAYER_STEP_DEPTH) - f64::from(layer) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scale-by-power-of-two formulation, matching the hardware instruction sequence
    /// (`fscale`) that computes the same transform.
    fn encode_scaled(rank: f64, depth: u32) -> f64 {
        (rank + f64::from(depth) / 2.0) * 2f64.powi(depth as i32)
    }

    fn decode_scaled(value: f64, depth: u32) -> f64 {
        value * 2f64.powi(-(depth as i32)) - f64::from(depth) / 2.0
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0.0, 0), 0.0);
        assert_eq!(encode(42.0, 0), 42.0);
        assert_eq!(encode(42.0, 1), 85.0);
        assert_eq!(encode(3.0, 2), 16.0);
        assert_eq!(encode(-1.0, 4), 16.0);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for depth in 0..=40u32 {
            for rank in [-1_000i64, -7, -1, 0, 1, 2, 17, 42, 99, 65_535, 1 << 20] {
                let encoded = encode(rank as f64, depth);
                let decoded = decode(encoded, depth);
                assert_eq!(decoded.round() as i64, rank, "depth={depth} rank={rank}");
            }
        }
    }

    #[test]
    fn test_formulations_agree() {
        for depth in 0..=60u32 {
            for rank in [0.0, 0.5, 1.0, 42.0, 12_345.25, -3.0] {
                let a = encode(rank, depth);
                let b = encode_scaled(rank, depth);
                assert_eq!(a.to_bits(), b.to_bits(), "encode depth={depth} rank={rank}");

                let c = decode(a, depth);
                let d = decode_scaled(b, depth);
                assert_eq!(c.to_bits(), d.to_bits(), "decode depth={depth} rank={rank}");
            }
        }
    }

    #[test]
    fn test_layer_pair_is_exact_for_integers() {
        for layer in 0..=64u32 {
            for rank in 0..200i64 {
                let forward = encode_layer(rank as f64, layer);
                assert_eq!(forward, (2 * rank + i64::from(layer) + 1) as f64);
                assert_eq!(decode_layer(forward, layer), rank as f64);
            }
        }
    }

    #[test]
    fn test_oversized_depth_is_not_finite() {
        assert!(encode(1.0, 1100).is_infinite());
        assert_eq!(decode(1.0, 1100), -550.0);
    }
}

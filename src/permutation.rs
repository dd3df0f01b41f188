//! Inverse ranking of k-permutations via factorial-number-system digits

use serde::{Deserialize, Serialize};

/// Per-position selection indices of a k-permutation.
///
/// Element `j - 1` is the digit for position `j` (1-indexed) and, for a valid rank,
/// lies in `0..=j`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permutation(pub Vec<i64>);

impl Permutation {
    pub fn digits(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Permutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, digit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{digit}")?;
        }
        write!(f, "]")
    }
}

/// Convert `rank` into its `k` mixed-radix digits.
///
/// At position `j` (1..=k) the running factor is `j!` and the emitted digit is
/// `(rank / j!) % (j + 1)` using truncating division. The population size `n` is carried for the
/// caller's bookkeeping and does not affect the digits; ranks outside
/// `[0, n!/(n-k)!)` still produce a well-defined sequence.
///
/// Once `j!` no longer fits in `i64` it exceeds every possible rank, so all
/// remaining digits are zero.
pub fn rank_to_permutation(_total: u32, chosen: u32, rank: i64) -> Permutation {
    let mut digits = Vec::with_capacity(chosen as usize);
    let mut factor: Option<i64> = Some(1);

    for j in 1..=i64::from(chosen) {
        factor = factor.and_then(|f| f.checked_mul(j));
        let digit = match factor {
            Some(f) => (rank / f) % (j + 1),
            None => 0,
        };
        digits.push(digit);
    }

    Permutation(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_rank() {
        // 42 = 0*1! + 0*2! + 3*3!
        assert_eq!(rank_to_permutation(5, 3, 42), Permutation(vec![0, 0, 3]));
        assert_eq!(rank_to_permutation(5, 3, 0), Permutation(vec![0, 0, 0]));
        assert_eq!(rank_to_permutation(5, 3, 23), Permutation(vec![1, 2, 3]));
    }

    #[test]
    fn test_digits_cover_mixed_radix_space() {
        // k = 3 digits have radices 2, 3, 4: ranks 0..24 enumerate every combination once.
        let mut seen = std::collections::HashSet::new();
        for rank in 0..24 {
            let perm = rank_to_permutation(5, 3, rank);
            for (pos, &digit) in perm.digits().iter().enumerate() {
                assert!((0..=pos as i64 + 1).contains(&digit));
            }
            assert!(seen.insert(perm));
        }
        assert_eq!(seen.len(), 24);
        // Wraps around after the full radix product.
        assert_eq!(rank_to_permutation(5, 3, 24), rank_to_permutation(5, 3, 0));
    }

    #[test]
    fn test_zero_length() {
        let perm = rank_to_permutation(5, 0, 42);
        assert!(perm.is_empty());
    }

    #[test]
    fn test_factor_overflow_yields_zero_digits() {
        let perm = rank_to_permutation(40, 30, i64::MAX);
        assert_eq!(perm.len(), 30);
        // 21! overflows i64
        assert!(perm.digits()[20..].iter().all(|&d| d == 0));
        assert!(perm.digits()[..20].iter().any(|&d| d != 0));
    }

    #[test]
    fn test_negative_rank_is_well_defined() {
        let perm = rank_to_permutation(5, 3, -42);
        assert_eq!(perm, Permutation(vec![0, 0, -3]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Permutation(vec![0, 2, 3]).to_string(), "[0, 2, 3]");
        assert_eq!(Permutation(vec![]).to_string(), "[]");
    }
}

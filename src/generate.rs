//! Shuffled test-set generation
//!
//! Produces the integers `1..=n^k` in random order, optionally pushed through
//! the layered encoder so the driver can invert them back.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::config::layer_depth;
use crate::engine::{encode_chain, InvertError};
use crate::error::Error;

const LOG_TARGET: &str = "layered_rank::generate";

/// Upper bound on the number of generated values
pub const MAX_TEST_SET: u64 = 1 << 26;

/// `n^k`, rejected when it overflows or exceeds [`MAX_TEST_SET`]
pub fn set_size(n: u32, k: u32) -> Result<u64, Error> {
    let size = u64::from(n)
        .checked_pow(k)
        .ok_or_else(|| Error::config(format!("{n}^{k} overflows u64")))?;
    if size > MAX_TEST_SET {
        return Err(Error::config(format!(
            "{n}^{k} = {size} values exceeds the limit of {MAX_TEST_SET}"
        )));
    }
    Ok(size)
}

/// Shuffled `1..=n^k`; with `encode`, each value is passed through
/// `ceil(k * log2(n))` encoding layers after shuffling.
pub fn generate<R: Rng + ?Sized>(
    n: u32,
    k: u32,
    encode: bool,
    rng: &mut R,
) -> Result<Vec<i64>, Error> {
    let size = set_size(n, k)?;
    // size <= MAX_TEST_SET, so it fits in i64
    let mut values: Vec<i64> = (1..=size as i64).collect();
    values.shuffle(rng);

    if encode {
        let depth = layer_depth(n, k)?;
        values = values
            .into_iter()
            .map(|value| encode_chain(value, depth))
            .collect::<Result<Vec<_>, InvertError>>()?;
    }

    info!(
        target = LOG_TARGET,
        n,
        k,
        values = values.len(),
        encode,
        "generated test set"
    );

    Ok(values)
}

/// One value per line
pub fn write_values<W: Write>(values: &[i64], mut out: W) -> io::Result<()> {
    for value in values {
        writeln!(out, "{value}")?;
    }
    out.flush()
}

pub fn save_values(path: &Path, values: &[i64]) -> Result<(), Error> {
    let name = path.display().to_string();
    let file = File::create(path).map_err(|err| Error::io(name.as_str(), err))?;
    write_values(values, BufWriter::new(file)).map_err(|err| Error::io(name, err))
}

//! Line-record input: parsing, malformed-record policy and value selection

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

const LOG_TARGET: &str = "layered_rank::input";

/// What to do with a line that does not parse as an integer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort loading with [`Error::MalformedRecord`]
    #[default]
    Fail,
    /// Log a warning and continue with the next line
    Skip,
}

/// Which loaded value is fed to the inversion engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Min,
    Max,
}

/// Where the integer sits inside each line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordLayout {
    /// Zero-based comma-separated field holding the value
    pub column: usize,
    /// Skip the first line
    pub has_header: bool,
}

/// Values read from an input source
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedValues {
    pub values: Vec<i64>,
    /// Malformed records dropped under [`MalformedPolicy::Skip`]
    pub skipped: usize,
}

/// Parse the integer in `column` of `line`, tolerating surrounding whitespace.
pub fn parse_record(line: &str, column: usize) -> Option<i64> {
    line.split(',').nth(column)?.trim().parse().ok()
}

/// Read one record per line from `reader`.
///
/// Blank lines are not records and are ignored. A line that is not valid UTF-8
/// is a malformed record like any other. `input` names the source in errors
/// and logs.
pub fn read_values<R: BufRead>(
    reader: R,
    input: &str,
    layout: RecordLayout,
    policy: MalformedPolicy,
) -> Result<LoadedValues, Error> {
    let mut loaded = LoadedValues::default();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw.map_err(|err| Error::io(input, err))?;
        if idx == 0 && layout.has_header {
            continue;
        }
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let (line, parsed) = match String::from_utf8(raw) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let parsed = parse_record(&line, layout.column);
                (line, parsed)
            }
            Err(err) => (String::from_utf8_lossy(err.as_bytes()).into_owned(), None),
        };

        match parsed {
            Some(value) => loaded.values.push(value),
            None => match policy {
                MalformedPolicy::Fail => {
                    return Err(Error::MalformedRecord {
                        input: input.to_string(),
                        line: idx + 1,
                        content: line,
                    })
                }
                MalformedPolicy::Skip => {
                    warn!(
                        target = LOG_TARGET,
                        input,
                        line = idx + 1,
                        content = %line,
                        "skipping malformed record"
                    );
                    loaded.skipped += 1;
                }
            },
        }
    }

    debug!(
        target = LOG_TARGET,
        input,
        values = loaded.values.len(),
        skipped = loaded.skipped,
        "loaded input"
    );

    Ok(loaded)
}

/// Open `path` and read its records.
pub fn load_values(
    path: &Path,
    layout: RecordLayout,
    policy: MalformedPolicy,
) -> Result<LoadedValues, Error> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|err| Error::io(name.as_str(), err))?;
    read_values(BufReader::new(file), &name, layout, policy)
}

/// Index and value of the selected element; ties go to the first occurrence.
pub fn select(values: &[i64], selection: Selection) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        let better = match (best, selection) {
            (None, _) => true,
            (Some((_, current)), Selection::Min) => value < current,
            (Some((_, current)), Selection::Max) => value > current,
        };
        if better {
            best = Some((idx, value));
        }
    }
    best
}

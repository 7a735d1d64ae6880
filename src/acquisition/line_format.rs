//! Semicolon-delimited reading format
//!
//! One reading per line: `timestamp;x;y;z`, no header. Timestamps are sensor
//! milliseconds (fractional accepted on input, integral on output).
//!
//! ```text
//! 1642776059262;-5.1630707;7.9308043;2.5847285
//! 1642776059281;-5.1630707;7.9308043;2.5847285
//! ```
//!
//! Parsing is lenient: blank lines, lines with fewer than four fields and
//! lines whose fields are not numbers are skipped, never reported as errors.
//! Neither ordering nor uniqueness of timestamps is checked here.

use crate::types::Reading;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Field separator
pub const DELIMITER: char = ';';

/// Parse a single line. `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<Reading> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut fields = trimmed.split(DELIMITER).map(str::trim);
    let (Some(t), Some(x), Some(y), Some(z)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        tracing::debug!(line = trimmed, "Skipping line with fewer than 4 fields");
        return None;
    };

    match (t.parse(), x.parse(), y.parse(), z.parse()) {
        (Ok(timestamp), Ok(x), Ok(y), Ok(z)) => Some(Reading::new(timestamp, x, y, z)),
        _ => {
            tracing::debug!(line = trimmed, "Skipping line with non-numeric field");
            None
        }
    }
}

/// Parse a sequence of lines into readings, in input order.
pub fn parse_lines<I, S>(lines: I) -> Vec<Reading>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Format one reading. The timestamp is truncated toward zero.
pub fn format_reading(reading: &Reading) -> String {
    // `{:?}` keeps a trailing ".0" on whole numbers so values re-parse as floats
    format!(
        "{}{DELIMITER}{:?}{DELIMITER}{:?}{DELIMITER}{:?}",
        reading.timestamp.trunc() as i64,
        reading.x,
        reading.y,
        reading.z
    )
}

/// Serialize readings, one line each.
pub fn readings_to_lines(readings: &[Reading]) -> Vec<String> {
    readings.iter().map(format_reading).collect()
}

/// Read every line of a reading file.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Read and parse a reading file.
pub fn load_readings(path: impl AsRef<Path>) -> Result<Vec<Reading>> {
    let lines = read_lines(path.as_ref())?;
    let readings = parse_lines(&lines);
    tracing::debug!(
        path = %path.as_ref().display(),
        lines = lines.len(),
        readings = readings.len(),
        "Loaded readings"
    );
    Ok(readings)
}

/// Write readings in line format to any sink.
pub fn write_readings<W: Write>(mut writer: W, readings: &[Reading]) -> Result<()> {
    for reading in readings {
        writeln!(writer, "{}", format_reading(reading)).context("Failed to write reading")?;
    }
    writer.flush().context("Failed to flush readings")?;
    Ok(())
}

/// Write readings to a file, replacing any existing content.
pub fn save_readings(path: impl AsRef<Path>, readings: &[Reading]) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_readings(BufWriter::new(file), readings)
        .with_context(|| format!("Failed to save {}", path.display()))
}

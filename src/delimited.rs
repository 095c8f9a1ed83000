//! Delimiter-separated text input.
//!
//! Text tables take a simpler path than workbooks: the bytes are decoded,
//! the delimiter is detected (or taken from the options), and each
//! non-blank line becomes one row of trimmed fields.

use crate::error::Result;
use crate::model::Matrix;
use crate::options::DecodeOptions;
use encoding_rs::WINDOWS_1252;
use log::{debug, warn};
use std::borrow::Cow;

/// Delimiters tried during detection, in order of preference on ties.
pub const CANDIDATE_DELIMITERS: [u8; 5] = [b',', b';', b'\t', b'|', b' '];

/// Number of non-blank lines sampled for detection.
const SAMPLE_LINES: usize = 20;

/// Read a delimited text table.
///
/// # Example
///
/// ```
/// use rawsheet::{read_delimited, DecodeOptions};
///
/// let matrix = read_delimited(b"name;age\nAda; 36\n\nBob;7\n", &DecodeOptions::default())?;
/// assert_eq!(matrix.rows[1], vec!["Ada", "36"]);
/// assert_eq!(matrix.height(), 3);
/// # Ok::<(), rawsheet::Error>(())
/// ```
pub fn read_delimited(data: &[u8], options: &DecodeOptions) -> Result<Matrix> {
    let text = decode_text(data);
    let delimiter = match options.delimiter {
        Some(delimiter) => delimiter,
        None => detect_delimiter(&text),
    };
    debug!("reading delimited text with delimiter {:?}", delimiter as char);

    let rows = if delimiter == b' ' {
        split_whitespace_rows(&text)
    } else {
        split_rows(&text, delimiter)?
    };

    let mut matrix = Matrix::from_rows(rows);
    if options.cleans_cells() {
        matrix.map_cells(|cell| options.clean_cell(cell));
    }
    if options.transpose {
        matrix = matrix.transpose();
    }
    Ok(matrix)
}

/// Decode text bytes as UTF-8, falling back to Windows-1252 (Latin-1).
///
/// A UTF-8 byte order mark is removed.
pub fn decode_text(data: &[u8]) -> Cow<'_, str> {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            warn!("input is not valid UTF-8 ({}), decoding as Latin-1", e);
            let (text, _, _) = WINDOWS_1252.decode(data);
            text
        }
    }
}

/// Pick the delimiter whose column counts are most consistent.
///
/// Each candidate is scored over the first non-blank lines: only
/// candidates that split some line into two or more fields qualify, the
/// lowest variance of the per-line column count wins, and ties go to the
/// higher mean count and then to the earlier candidate. Whitespace is only
/// chosen when no other candidate qualifies, since free text splits on it
/// too. Falls back to `,`.
pub fn detect_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    let mut best: Option<(u8, f64, f64)> = None;
    for &candidate in &CANDIDATE_DELIMITERS {
        if candidate == b' ' && best.is_some() {
            break;
        }
        let Some((variance, mean)) = score(&sample, candidate) else {
            continue;
        };

        let better = match best {
            None => true,
            Some((_, best_variance, best_mean)) => {
                variance < best_variance || (variance == best_variance && mean > best_mean)
            }
        };
        if better {
            best = Some((candidate, variance, mean));
        }
    }

    best.map_or(b',', |(delimiter, _, _)| delimiter)
}

/// Score one candidate as `(variance, mean)` of its per-line column counts.
fn score(sample: &[&str], candidate: u8) -> Option<(f64, f64)> {
    let counts: Vec<usize> = sample
        .iter()
        .map(|line| column_count(line, candidate))
        .collect();
    if counts.iter().all(|&n| n < 2) {
        return None;
    }

    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let variance = counts
        .iter()
        .map(|&n| (n as f64 - mean).powi(2))
        .sum::<f64>()
        / counts.len() as f64;
    Some((variance, mean))
}

fn column_count(line: &str, delimiter: u8) -> usize {
    if delimiter == b' ' {
        return line.split_whitespace().count();
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader
        .records()
        .next()
        .and_then(|record| record.ok())
        .map_or(0, |record| record.len())
}

fn split_rows(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) && record.len() <= 1 {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn split_whitespace_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

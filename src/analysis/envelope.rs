//! Amplitude envelope
//!
//! The envelope is the per-chunk peak of the analysed channel: one entry for
//! every `chunk_size` samples, plus one for a trailing partial chunk.

use std::fs;
use std::ops::Index;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};

/// Per-chunk peak amplitudes, in chunk order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    values: Vec<i32>,
}

impl Envelope {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Index of the last entry
    pub fn last_index(&self) -> Option<usize> {
        self.values.len().checked_sub(1)
    }
}

impl Index<usize> for Envelope {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        &self.values[index]
    }
}

impl From<Vec<i32>> for Envelope {
    fn from(values: Vec<i32>) -> Self {
        Self::new(values)
    }
}

impl FromStr for Envelope {
    type Err = TrimError;

    /// One integer per line. Blank lines are skipped.
    fn from_str(text: &str) -> Result<Self> {
        let mut values = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value = line.parse::<i32>().map_err(|e| {
                TrimError::format(format!(
                    "line {}: '{}' is not an amplitude value ({})",
                    line_no + 1,
                    line,
                    e
                ))
            })?;
            values.push(value);
        }
        Ok(Self { values })
    }
}

/// Peak of each `chunk_size` chunk of `samples`
///
/// # Errors
/// * `InvalidParameter` - `chunk_size` is zero
pub fn extract_envelope(samples: &[i16], chunk_size: usize) -> Result<Envelope> {
    if chunk_size == 0 {
        return Err(TrimError::InvalidParameter {
            param: "chunk_size".to_string(),
            value: "0".to_string(),
            expected: ">= 1".to_string(),
        });
    }

    let values = samples
        .chunks(chunk_size)
        .filter_map(|chunk| chunk.iter().max().map(|&peak| i32::from(peak)))
        .collect();

    Ok(Envelope { values })
}

/// Parse envelope text (one integer per line)
pub fn parse_envelope_text(text: &str) -> Result<Envelope> {
    text.parse()
}

/// Read an envelope from a text file
pub fn read_envelope_text(path: &Path) -> Result<Envelope> {
    let text = fs::read_to_string(path).map_err(|e| TrimError::io(path, e))?;
    parse_envelope_text(&text)
}

//! Trim-point location
//!
//! Works on the smoothed envelope. The peak anchors both searches:
//! - the start is the point just after the last dip before the peak
//! - the end is where a run of near-silence after the peak completes

use serde::{Deserialize, Serialize};

use super::envelope::Envelope;
use crate::error::{Result, TrimError};

/// A position in an envelope and the amplitude there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedPoint {
    pub index: usize,
    pub value: i32,
}

impl IndexedPoint {
    fn at(envelope: &Envelope, index: usize) -> Self {
        Self {
            index,
            value: envelope[index],
        }
    }
}

/// Index of the first occurrence of the maximum
///
/// # Errors
/// * `EmptyInput` - the envelope has no entries
pub fn arg_max(envelope: &Envelope) -> Result<usize> {
    let values = envelope.values();
    let first = *values
        .first()
        .ok_or(TrimError::EmptyInput { what: "envelope" })?;

    let mut max_index = 0;
    let mut max_value = first;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > max_value {
            max_value = value;
            max_index = i;
        }
    }
    Ok(max_index)
}

/// Walk back from the peak until the previous entry is larger
///
/// Returns index 0 if the envelope rises all the way to the peak.
/// A `max_index` past the end is clamped to the last index.
pub fn find_start(smoothed: &Envelope, max_index: usize) -> Result<IndexedPoint> {
    let mut j = clamp_index(smoothed, max_index)?;
    while j > 0 {
        if smoothed[j - 1] > smoothed[j] {
            break;
        }
        j -= 1;
    }
    Ok(IndexedPoint::at(smoothed, j))
}

/// Walk forward from the peak until `allowed_silence` consecutive entries
/// fall below `percent` of the peak
///
/// Any entry at or above the threshold resets the count. Returns the last
/// index if the run never completes.
pub fn find_end(
    smoothed: &Envelope,
    max_index: usize,
    percent: f64,
    allowed_silence: usize,
) -> Result<IndexedPoint> {
    let max_index = clamp_index(smoothed, max_index)?;
    let threshold = percent * f64::from(smoothed[max_index]);

    let mut silent = 0;
    for i in max_index..smoothed.len() {
        if f64::from(smoothed[i]) < threshold {
            silent += 1;
            if silent >= allowed_silence {
                return Ok(IndexedPoint::at(smoothed, i));
            }
        } else {
            silent = 0;
        }
    }
    Ok(IndexedPoint::at(smoothed, smoothed.len() - 1))
}

fn clamp_index(envelope: &Envelope, index: usize) -> Result<usize> {
    let last = envelope
        .last_index()
        .ok_or(TrimError::EmptyInput { what: "envelope" })?;
    Ok(index.min(last))
}

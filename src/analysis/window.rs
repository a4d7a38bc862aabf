//! Envelope-to-sample index mapping
//!
//! Trim points are found in envelope indices (one per chunk). They are
//! scaled back to sample indices and widened by a fixed margin to make up
//! for chunk quantization and for the heuristics clipping too tightly.

use serde::{Deserialize, Serialize};

use crate::config::TrimConfig;
use crate::error::{Result, TrimError};

/// Sample-domain range kept in the output, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimWindow {
    start: usize,
    end: usize,
}

impl TrimWindow {
    /// Build a window over a recording of `total_samples` samples
    ///
    /// # Errors
    /// * `InvalidParameter` - unless `start < end <= total_samples`
    pub fn new(start: usize, end: usize, total_samples: usize) -> Result<Self> {
        if start >= end || end > total_samples {
            return Err(TrimError::InvalidParameter {
                param: "trim window".to_string(),
                value: format!("{}..{}", start, end),
                expected: format!("start < end <= {}", total_samples),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of samples kept
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; a window holds at least one sample
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Map `index` from a sequence of `old_size` onto one of `new_size`
///
/// `floor(index / old_size * new_size)`, in exact integer arithmetic.
pub fn rescale(index: usize, old_size: usize, new_size: usize) -> usize {
    if old_size == 0 {
        return 0;
    }
    (index as u128 * new_size as u128 / old_size as u128) as usize
}

/// Move a start index back by `padding_chunks` chunks, not below zero
pub fn pad_start(index: usize, chunk_size: usize, padding_chunks: usize) -> usize {
    index.saturating_sub(padding_chunks.saturating_mul(chunk_size))
}

/// Move an end index forward by `padding_chunks` chunks, not past
/// `total_samples`
pub fn pad_end(
    index: usize,
    chunk_size: usize,
    total_samples: usize,
    padding_chunks: usize,
) -> usize {
    index
        .saturating_add(padding_chunks.saturating_mul(chunk_size))
        .min(total_samples)
}

/// Turn envelope-domain start/end into a padded sample-domain window
///
/// # Errors
/// * `InvalidParameter` - `envelope_len * chunk_size` overflows, or the
///   padded window is empty or out of range
pub fn to_sample_window(
    start: usize,
    end: usize,
    envelope_len: usize,
    total_samples: usize,
    config: &TrimConfig,
) -> Result<TrimWindow> {
    let space = sample_space(envelope_len, config.chunk_size)?;

    let sample_start = rescale(start, envelope_len, space);
    let sample_end = rescale(end, envelope_len, space);

    let padded_start = pad_start(sample_start, config.chunk_size, config.padding_chunks);
    let padded_end = pad_end(
        sample_end,
        config.chunk_size,
        total_samples,
        config.padding_chunks,
    );

    TrimWindow::new(padded_start, padded_end, total_samples)
}

/// Samples covered by `envelope_len` chunks of `chunk_size`
pub fn sample_space(envelope_len: usize, chunk_size: usize) -> Result<usize> {
    envelope_len
        .checked_mul(chunk_size)
        .ok_or_else(|| TrimError::InvalidParameter {
            param: "chunk_size".to_string(),
            value: chunk_size.to_string(),
            expected: format!("a size whose product with {} fits in usize", envelope_len),
        })
}

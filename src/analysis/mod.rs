//! Envelope Analysis
//!
//! Finds the region of interest in a recording:
//! envelope extraction → smoothing → trim-point location → sample window.

mod envelope;
mod locator;
mod smoother;
mod window;

pub use envelope::{extract_envelope, parse_envelope_text, read_envelope_text, Envelope};
pub use locator::{arg_max, find_end, find_start, IndexedPoint};
pub use smoother::smooth;
pub use window::{pad_end, pad_start, rescale, sample_space, to_sample_window, TrimWindow};

//! Audio Engine Module
//!
//! Container codec and file I/O:
//! - WAV header/payload model and byte-level parsing
//! - Whole-file reads and trimmed rewrites

pub mod container;
pub mod io;

pub use container::{parse_container, AudioContainer, Payload, ReadMode, WavHeader};
pub use io::{read_container, staging_path, trimmed_output_path, write_trimmed};

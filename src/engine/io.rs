//! Audio file I/O for breath-trim
//!
//! Reads whole recordings into memory and writes trimmed copies. Output is
//! staged in a sibling `.partial` file and renamed into place, so a failed
//! write never leaves a half-written recording behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::analysis::TrimWindow;
use crate::engine::container::{parse_container, AudioContainer, ReadMode, FRAME_BYTES};
use crate::error::{Result, TrimError};

/// Suffix appended to the output file stem
const TRIMMED_SUFFIX: &str = "-trimmed.wav";

/// Suffix of the staging file used while writing
const PARTIAL_EXTENSION: &str = "partial";

/// Read and parse an audio file
///
/// # Errors
/// * `Io` - the file cannot be opened or read
/// * `Format` / `NoData` - see [`parse_container`]
pub fn read_container(path: &Path, mode: ReadMode) -> Result<AudioContainer> {
    let bytes = fs::read(path).map_err(|e| TrimError::io(path, e))?;
    let container = parse_container(&bytes, mode)?;

    debug!(
        "Read {} ({:?} mode, {} bytes)\n{}",
        path.display(),
        mode,
        bytes.len(),
        container.header
    );

    Ok(container)
}

/// Name of the file actually written for an output path
///
/// `out/breath.wav` becomes `out/breath-trimmed.wav`.
pub fn trimmed_output_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_path.with_file_name(format!("{}{}", stem, TRIMMED_SUFFIX))
}

/// Write the part of a rewrite-mode container inside `window`
///
/// The window is in sample-domain indices; each index covers
/// [`FRAME_BYTES`] payload bytes. Returns the path written.
///
/// # Errors
/// * `Format` - the container was read in analysis mode
/// * `EmptyInput` - the window selects no bytes of the payload
/// * `Io` - the output cannot be written
pub fn write_trimmed(
    output_path: &Path,
    container: AudioContainer,
    window: TrimWindow,
) -> Result<PathBuf> {
    let (mut header, raw) = container.into_raw()?;

    let start_byte = window.start() * FRAME_BYTES;
    let mut end_byte = window.end() * FRAME_BYTES;
    if end_byte > raw.len() {
        warn!(
            "Trim window ends at byte {} but payload has {}; clamping",
            end_byte,
            raw.len()
        );
        end_byte = raw.len();
    }
    if start_byte >= end_byte {
        return Err(TrimError::EmptyInput {
            what: "trimmed payload",
        });
    }

    let trimmed = &raw[start_byte..end_byte];
    header.data_size = trimmed.len() as u32;
    header.file_size = header.riff_size_for(header.data_size);

    let mut bytes = header.to_bytes();
    bytes.extend_from_slice(trimmed);

    let target = trimmed_output_path(output_path);
    write_atomically(&target, &bytes)?;

    debug!(
        "Wrote {} ({} of {} payload bytes kept)",
        target.display(),
        trimmed.len(),
        raw.len()
    );

    Ok(target)
}

/// Sibling file written before being renamed onto `target`
pub fn staging_path(target: &Path) -> PathBuf {
    target.with_extension(PARTIAL_EXTENSION)
}

fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let staging = staging_path(target);

    if let Err(e) = fs::write(&staging, bytes) {
        let _ = fs::remove_file(&staging);
        return Err(TrimError::io(&staging, e));
    }
    if let Err(e) = fs::rename(&staging, target) {
        let _ = fs::remove_file(&staging);
        return Err(TrimError::io(target, e));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn stereo_wav(frames: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(frames * 4);
        for i in 0..frames {
            data.extend_from_slice(&(i as i16).to_le_bytes());
            data.extend_from_slice(&(-(i as i16)).to_le_bytes());
        }
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&((36 + data.len()) as u32).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&8000u32.to_le_bytes());
        out.extend_from_slice(&32000u32.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn test_trimmed_output_path() {
        assert_eq!(
            trimmed_output_path(Path::new("/tmp/out/breath.wav")),
            PathBuf::from("/tmp/out/breath-trimmed.wav")
        );
        assert_eq!(
            trimmed_output_path(Path::new("breath")),
            PathBuf::from("breath-trimmed.wav")
        );
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_container(Path::new("/nonexistent/path/breath.wav"), ReadMode::Analysis);
        match result.unwrap_err() {
            TrimError::Io { path, .. } => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected Io error, got: {:?}", other),
        }
    }

    #[test]
    fn test_write_trimmed_slices_frames() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.wav");
        fs::write(&input, stereo_wav(100)).unwrap();

        let container = read_container(&input, ReadMode::Rewrite).unwrap();
        let original_bytes = container.raw().unwrap().to_vec();
        let window = TrimWindow::new(10, 30, 100).unwrap();
        let written = write_trimmed(&dir.path().join("out.wav"), container, window).unwrap();

        assert_eq!(written, dir.path().join("out-trimmed.wav"));
        let bytes = fs::read(&written).unwrap();
        let reparsed = parse_container(&bytes, ReadMode::Rewrite).unwrap();
        assert_eq!(reparsed.header.data_size, 80);
        assert_eq!(reparsed.header.file_size, 36 + 80);
        assert_eq!(reparsed.raw().unwrap(), &original_bytes[40..120]);
        assert!(!dir.path().join("out-trimmed.partial").exists());
    }

    #[test]
    fn test_write_trimmed_does_not_touch_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.wav");
        let original = stereo_wav(50);
        fs::write(&input, &original).unwrap();

        let container = read_container(&input, ReadMode::Rewrite).unwrap();
        let window = TrimWindow::new(0, 25, 50).unwrap();
        write_trimmed(&dir.path().join("out.wav"), container, window).unwrap();

        assert_eq!(fs::read(&input).unwrap(), original);
    }

    #[test]
    fn test_write_requires_rewrite_mode() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.wav");
        fs::write(&input, stereo_wav(10)).unwrap();

        let container = read_container(&input, ReadMode::Analysis).unwrap();
        let window = TrimWindow::new(0, 5, 10).unwrap();
        let result = write_trimmed(&dir.path().join("out.wav"), container, window);

        assert!(result.is_err());
        assert!(!dir.path().join("out-trimmed.wav").exists());
    }

    #[test]
    fn test_write_into_missing_directory_leaves_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.wav");
        fs::write(&input, stereo_wav(10)).unwrap();

        let container = read_container(&input, ReadMode::Rewrite).unwrap();
        let window = TrimWindow::new(0, 5, 10).unwrap();
        let output = dir.path().join("missing").join("out.wav");
        let err = write_trimmed(&output, container, window).unwrap_err();

        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!dir.path().join("missing").exists());
    }
}

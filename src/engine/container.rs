//! WAV container model and codec
//!
//! Parses the fixed 16-bit PCM RIFF layout recorded by the breath sensor:
//! RIFF header, `fmt ` subchunk, an optional `FLLR` filler subchunk, then
//! the `data` subchunk. All numeric fields are little-endian.
//!
//! The payload is decoded in one of two ways, chosen by [`ReadMode`]:
//! typed samples for analysis, or untouched bytes for rewriting.

use std::fmt;

use crate::error::{Result, TrimError};

// ============================================================================
// Constants
// ============================================================================

pub const RIFF_TAG: [u8; 4] = *b"RIFF";
pub const WAVE_TAG: [u8; 4] = *b"WAVE";
pub const FMT_TAG: [u8; 4] = *b"fmt ";
pub const DATA_TAG: [u8; 4] = *b"data";

/// Filler subchunk some recorders place before the data subchunk
pub const FILLER_TAG: [u8; 4] = *b"FLLR";

/// Audio format code for uncompressed PCM
pub const PCM_FORMAT: u16 = 1;

/// Bytes of fixed fields in a `fmt ` subchunk
pub const FMT_FIXED_SIZE: u32 = 16;

/// Payload bytes per sample-domain index (one stereo 16-bit frame)
pub const FRAME_BYTES: usize = 4;

/// Bytes counted by the RIFF size field ahead of the fmt body:
/// the `WAVE` tag plus the `fmt ` tag and size
const RIFF_SIZE_OVERHEAD: u32 = 4 + 8;

/// Which representation the payload is decoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Decode as signed 16-bit samples, keeping one interleaved channel
    Analysis,
    /// Keep the payload bytes exactly as stored
    Rewrite,
}

// ============================================================================
// Header
// ============================================================================

/// Header fields of a parsed container, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_tag: [u8; 4],
    /// Declared RIFF size, less any skipped filler
    pub file_size: u32,
    pub wave_tag: [u8; 4],
    pub fmt_tag: [u8; 4],
    pub fmt_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// `fmt ` bytes beyond the 16 fixed ones, kept verbatim
    pub fmt_extension: Vec<u8>,
    pub data_tag: [u8; 4],
    pub data_size: u32,
    /// Declared size of the filler subchunk, if one was skipped
    pub filler_size: Option<u32>,
}

impl WavHeader {
    /// Serialize the header, up to and including the data size field
    ///
    /// The filler subchunk is never written back.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(44 + self.fmt_extension.len());
        out.extend_from_slice(&self.riff_tag);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.wave_tag);
        out.extend_from_slice(&self.fmt_tag);
        out.extend_from_slice(&self.fmt_size.to_le_bytes());
        out.extend_from_slice(&self.audio_format.to_le_bytes());
        out.extend_from_slice(&self.num_channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        out.extend_from_slice(&self.fmt_extension);
        out.extend_from_slice(&self.data_tag);
        out.extend_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// RIFF size for a file with this header and `data_size` payload bytes
    pub fn riff_size_for(&self, data_size: u32) -> u32 {
        RIFF_SIZE_OVERHEAD + self.fmt_size + 8 + data_size
    }

    /// Recording duration implied by the data size
    pub fn duration_secs(&self) -> f64 {
        if self.byte_rate == 0 {
            return 0.0;
        }
        self.data_size as f64 / self.byte_rate as f64
    }
}

impl fmt::Display for WavHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chunk descriptor : {}", tag_str(&self.riff_tag))?;
        writeln!(f, "File size        : {}", self.file_size)?;
        writeln!(f, "Format           : {}", tag_str(&self.wave_tag))?;
        writeln!(f, "fmt subchunk     : {}", tag_str(&self.fmt_tag))?;
        writeln!(f, "fmt size         : {}", self.fmt_size)?;
        writeln!(f, "Audio format     : {} (pcm=1)", self.audio_format)?;
        writeln!(f, "Channels         : {}", self.num_channels)?;
        writeln!(f, "Sample rate      : {}", self.sample_rate)?;
        writeln!(f, "Byte rate        : {}", self.byte_rate)?;
        writeln!(f, "Block align      : {}", self.block_align)?;
        writeln!(f, "Bits per sample  : {}", self.bits_per_sample)?;
        if let Some(size) = self.filler_size {
            writeln!(f, "Filler skipped   : {} bytes", size)?;
        }
        writeln!(f, "Data subchunk    : {}", tag_str(&self.data_tag))?;
        write!(f, "Data size        : {}", self.data_size)
    }
}

fn tag_str(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

// ============================================================================
// Container
// ============================================================================

/// Payload in exactly one representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// One channel of signed 16-bit samples
    Samples(Vec<i16>),
    /// The data subchunk bytes as stored
    Raw(Vec<u8>),
}

/// A parsed audio file: header plus payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioContainer {
    pub header: WavHeader,
    pub payload: Payload,
}

impl AudioContainer {
    /// Samples, if read in analysis mode
    pub fn samples(&self) -> Option<&[i16]> {
        match &self.payload {
            Payload::Samples(samples) => Some(samples),
            Payload::Raw(_) => None,
        }
    }

    /// Raw bytes, if read in rewrite mode
    pub fn raw(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Raw(bytes) => Some(bytes),
            Payload::Samples(_) => None,
        }
    }

    /// Consume the container, keeping the analysis samples
    pub fn into_samples(self) -> Result<Vec<i16>> {
        match self.payload {
            Payload::Samples(samples) => Ok(samples),
            Payload::Raw(_) => Err(TrimError::format(
                "container was read in rewrite mode, samples are not decoded",
            )),
        }
    }

    /// Consume the container, splitting header and raw bytes
    pub fn into_raw(self) -> Result<(WavHeader, Vec<u8>)> {
        match self.payload {
            Payload::Raw(bytes) => Ok((self.header, bytes)),
            Payload::Samples(_) => Err(TrimError::format(
                "container was read in analysis mode, raw bytes were not kept",
            )),
        }
    }
}

/// Parse a complete file image
///
/// # Errors
/// * `Format` - bad tags, unsupported encoding, or truncated header/payload
/// * `NoData` - the data subchunk declares zero bytes
pub fn parse_container(bytes: &[u8], mode: ReadMode) -> Result<AudioContainer> {
    let mut reader = ByteReader::new(bytes);

    let riff_tag = reader.tag("container tag")?;
    let file_size = reader.u32("file size")?;
    let wave_tag = reader.tag("format tag")?;
    expect_tag(riff_tag, RIFF_TAG)?;
    expect_tag(wave_tag, WAVE_TAG)?;

    let fmt_tag = reader.tag("fmt subchunk tag")?;
    expect_tag(fmt_tag, FMT_TAG)?;
    let fmt_size = reader.u32("fmt subchunk size")?;
    if fmt_size < FMT_FIXED_SIZE {
        return Err(TrimError::format(format!(
            "fmt subchunk is {} bytes, need at least {}",
            fmt_size, FMT_FIXED_SIZE
        )));
    }
    let audio_format = reader.u16("audio format")?;
    let num_channels = reader.u16("channel count")?;
    let sample_rate = reader.u32("sample rate")?;
    let byte_rate = reader.u32("byte rate")?;
    let block_align = reader.u16("block align")?;
    let bits_per_sample = reader.u16("bits per sample")?;
    let fmt_extension = reader
        .take((fmt_size - FMT_FIXED_SIZE) as usize, "fmt extension")?
        .to_vec();

    if audio_format != PCM_FORMAT {
        return Err(TrimError::format(format!(
            "audio format {} is not uncompressed PCM",
            audio_format
        )));
    }
    if bits_per_sample != 16 {
        return Err(TrimError::format(format!(
            "{}-bit audio (only 16-bit supported)",
            bits_per_sample
        )));
    }

    let mut file_size = file_size;
    let mut filler_size = None;
    let mut data_tag = reader.tag("data subchunk tag")?;
    let mut data_size = reader.u32("data subchunk size")?;

    if data_tag == FILLER_TAG {
        file_size = file_size.saturating_sub(data_size);
        filler_size = Some(data_size);
        reader.take(data_size as usize, "filler subchunk")?;
        data_tag = reader.tag("data subchunk tag")?;
        data_size = reader.u32("data subchunk size")?;
    }
    expect_tag(data_tag, DATA_TAG)?;

    if data_size == 0 {
        return Err(TrimError::NoData);
    }

    let data = reader.take(data_size as usize, "data payload")?;
    let payload = match mode {
        ReadMode::Analysis => Payload::Samples(decode_one_channel(data)),
        ReadMode::Rewrite => Payload::Raw(data.to_vec()),
    };

    Ok(AudioContainer {
        header: WavHeader {
            riff_tag,
            file_size,
            wave_tag,
            fmt_tag,
            fmt_size,
            audio_format,
            num_channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            fmt_extension,
            data_tag,
            data_size,
            filler_size,
        },
        payload,
    })
}

/// Decode LE 16-bit samples, keeping every other one
fn decode_one_channel(data: &[u8]) -> Vec<i16> {
    data.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .step_by(2)
        .collect()
}

fn expect_tag(found: [u8; 4], expected: [u8; 4]) -> Result<()> {
    if found != expected {
        return Err(TrimError::format(format!(
            "expected '{}' tag, found '{}'",
            tag_str(&expected),
            tag_str(&found)
        )));
    }
    Ok(())
}

/// Bounds-checked little-endian cursor
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                TrimError::format(format!(
                    "truncated at {}: needed {} bytes at offset {}, file has {}",
                    field,
                    len,
                    self.pos,
                    self.bytes.len()
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn tag(&mut self, field: &str) -> Result<[u8; 4]> {
        let b = self.take(4, field)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    fn u16(&mut self, field: &str) -> Result<u16> {
        let b = self.take(2, field)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self, field: &str) -> Result<u32> {
        let b = self.take(4, field)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

// ============================================================================
// Tests
// ============================================================================

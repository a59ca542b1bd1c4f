//! Format detection for NMR spectrum files.
//!
//! Detection looks only at a bounded prefix read from a fresh
//! [`DataSource::open`], so probing never disturbs a later decode.
//! Formats are tried in order:
//!
//! - **UCSF**: "UCSF NMR" signature in the first 10 bytes
//! - **NMRPipe**: word 0 is zero and word 2 decodes to 2.345 in either
//!   byte order
//! - **Text**: the first non-blank line is made of numbers only

use serde::Serialize;

use crate::error::FormatError;
use crate::io::{read_prefix, ByteOrder, DataSource};

use super::pipe::fields::{PipeField, BYTE_ORDER_SENTINEL, BYTE_ORDER_TOLERANCE, HEADER_SIZE};
use super::ucsf::is_ucsf_magic;

// =============================================================================
// FileFormat
// =============================================================================

/// A file format this crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// NMRPipe binary (2048-byte header plus floats)
    Pipe,

    /// UCSF / Sparky tiled binary
    Ucsf,

    /// Sparse coordinate-prefixed text rows
    Text,
}

impl FileFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            FileFormat::Pipe => "NMRPipe",
            FileFormat::Ucsf => "UCSF (Sparky)",
            FileFormat::Text => "Sparse text",
        }
    }
}

/// Outcome of probing a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Matched(FileFormat),
    NotMatched,
}

// =============================================================================
// Format Detection
// =============================================================================

/// Bytes read for detection; enough for a full pipe header.
const PROBE_BYTES: usize = HEADER_SIZE;

/// Identify the format of a source.
///
/// # Returns
/// * `Ok(Probe::Matched(format))` - The first format whose check passed
/// * `Ok(Probe::NotMatched)` - No decoder recognizes the content
/// * `Err(FormatError::Io)` - The source could not be read
pub fn detect_format<S>(source: &S) -> Result<Probe, FormatError>
where
    S: DataSource + ?Sized,
{
    let mut reader = source.open()?;
    let prefix = read_prefix(&mut *reader, PROBE_BYTES)?;
    let truncated = prefix.len() == PROBE_BYTES && source.size() > PROBE_BYTES as u64;
    Ok(probe_bytes(&prefix, truncated))
}

/// Classify a byte prefix. `truncated` is true if the file continues past it.
pub fn probe_bytes(prefix: &[u8], truncated: bool) -> Probe {
    if is_ucsf_magic(prefix) {
        Probe::Matched(FileFormat::Ucsf)
    } else if is_pipe_header(prefix) {
        Probe::Matched(FileFormat::Pipe)
    } else if looks_like_text(prefix, truncated) {
        Probe::Matched(FileFormat::Text)
    } else {
        Probe::NotMatched
    }
}

/// Check if bytes start like an NMRPipe header.
///
/// This is a quick check that can be used before attempting full parsing.
pub fn is_pipe_header(bytes: &[u8]) -> bool {
    let sentinel_at = PipeField::FltOrder.offset() * 4;
    if bytes.len() < sentinel_at + 4 {
        return false;
    }

    [ByteOrder::BigEndian, ByteOrder::LittleEndian]
        .iter()
        .any(|&order| {
            let magic = order.read_u32(&bytes[0..4]);
            let sentinel = order.read_f32(&bytes[sentinel_at..sentinel_at + 4]);
            magic == 0 && (sentinel - BYTE_ORDER_SENTINEL).abs() <= BYTE_ORDER_TOLERANCE
        })
}

/// Check if the first non-blank line is whitespace-separated numbers.
fn looks_like_text(prefix: &[u8], truncated: bool) -> bool {
    let mut segments = prefix.split(|&b| b == b'\n').peekable();
    while let Some(segment) = segments.next() {
        let Ok(line) = std::str::from_utf8(segment) else {
            return false;
        };
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        // The last token of a cut-off line may itself be cut off
        if truncated && segments.peek().is_none() {
            tokens.pop();
        }
        return !tokens.is_empty() && tokens.iter().all(|t| t.parse::<f64>().is_ok());
    }
    false
}

// =============================================================================
// Tests
// =============================================================================

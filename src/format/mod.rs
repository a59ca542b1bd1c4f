//! Decoders for NMR spectrum files.
//!
//! Three families are supported:
//!
//! - **NMRPipe** ([`pipe`]): packed 2048-byte header plus a float payload
//! - **UCSF / Sparky** ([`ucsf`]): tiled binary payload
//! - **Sparse text** ([`text`]): coordinate-prefixed rows
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify a source, or
//! [`read_all_datasets`] to detect and decode in one call.

pub mod detect;
pub mod pipe;
pub mod text;
pub mod ucsf;

pub use detect::{detect_format, is_pipe_header, probe_bytes, FileFormat, Probe};

use tracing::debug;

use crate::dataset::{DataBundle, Dataset};
use crate::error::FormatError;
use crate::io::DataSource;

use text::TextOptions;

/// How [`read_all_datasets`] picks and configures a decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode as this format instead of probing
    pub format: Option<FileFormat>,
    /// Options passed to the text decoder
    pub text: TextOptions,
}

/// Decode a source with a known format.
pub fn read_dataset<S>(
    source: &S,
    format: FileFormat,
    options: &ReadOptions,
) -> Result<Dataset, FormatError>
where
    S: DataSource + ?Sized,
{
    let dataset = match format {
        FileFormat::Pipe => pipe::read_pipe(source)?,
        FileFormat::Ucsf => ucsf::read_ucsf(source)?.ok_or_else(|| FormatError::UnsupportedFormat {
            reason: format!("{}: missing UCSF signature", source.identifier()),
        })?,
        FileFormat::Text => text::read_text(source, &options.text)?,
    };
    Ok(dataset)
}

/// Decode every dataset a source holds.
///
/// Without an explicit format the source is probed first. Each supported
/// format holds exactly one dataset, so the bundle has one entry.
pub fn read_all_datasets<S>(source: &S, options: &ReadOptions) -> Result<DataBundle, FormatError>
where
    S: DataSource + ?Sized,
{
    let format = match options.format {
        Some(format) => format,
        None => match detect_format(source)? {
            Probe::Matched(format) => format,
            Probe::NotMatched => {
                return Err(FormatError::UnsupportedFormat {
                    reason: format!("{}: not a recognized NMR file", source.identifier()),
                })
            }
        },
    };

    debug!(source = source.identifier(), format = format.name(), "Decoding");
    Ok(DataBundle::from(read_dataset(source, format, options)?))
}

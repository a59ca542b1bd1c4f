//! Command-line configuration for the `nmr-ingest` binary.
//!
//! This module provides the CLI surface, which supports:
//! - Subcommands for inspecting, exporting and probing files
//! - Environment variables with `NMR_` prefix
//! - Validation before any file is opened
//!
//! # Environment Variables
//!
//! - `NMR_INPUT` - Input path or `file://` URI
//! - `NMR_FORMAT` - Input format (default: auto)
//! - `NMR_COORDINATE_COLUMNS` - Coordinate column count for text input
//! - `NMR_OUTPUT` - Output path for `export`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::text::{TextFlavor, TextOptions};
use crate::format::{FileFormat, ReadOptions};
use crate::io::Locator;

// =============================================================================
// CLI Arguments
// =============================================================================

/// nmr-ingest - Decode NMR spectrum files into dense grids.
///
/// Reads NMRPipe, UCSF (Sparky) and sparse text spectra.
#[derive(Parser, Debug, Clone)]
#[command(name = "nmr-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decode a file and print its shape, axes and provenance
    Inspect(InspectConfig),

    /// Decode a file and write it as coordinate-prefixed text
    Export(ExportConfig),

    /// Report which format a file is in without decoding it
    Probe(ProbeConfig),
}

/// Input format selection.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatChoice {
    /// Detect from the file content
    #[default]
    Auto,
    /// NMRPipe binary
    Pipe,
    /// UCSF (Sparky) binary
    Ucsf,
    /// Sparse text with coordinates as stored
    Text,
    /// NMRPipe pipe2txt export (axis 1 mirrored)
    PipeText,
}

impl FormatChoice {
    /// The decoder this choice forces, if any.
    pub fn format(self) -> Option<FileFormat> {
        match self {
            FormatChoice::Auto => None,
            FormatChoice::Pipe => Some(FileFormat::Pipe),
            FormatChoice::Ucsf => Some(FileFormat::Ucsf),
            FormatChoice::Text | FormatChoice::PipeText => Some(FileFormat::Text),
        }
    }

    pub fn text_flavor(self) -> TextFlavor {
        match self {
            FormatChoice::PipeText => TextFlavor::PipeExport,
            _ => TextFlavor::Plain,
        }
    }
}

/// Options shared by every command that decodes a file.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input path or file:// URI.
    #[arg(env = "NMR_INPUT")]
    pub locator: String,

    /// Input format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Auto, env = "NMR_FORMAT")]
    pub format: FormatChoice,

    /// Number of leading coordinate columns in text input.
    ///
    /// If not specified, coordinate columns are inferred from the data.
    #[arg(long, env = "NMR_COORDINATE_COLUMNS")]
    pub coordinate_columns: Option<usize>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InputArgs {
    /// Validate the input options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        Locator::parse(&self.locator).map_err(|e| e.to_string())?;

        if self.coordinate_columns == Some(0) {
            return Err("coordinate_columns must be greater than 0".to_string());
        }

        if self.coordinate_columns.is_some()
            && matches!(self.format, FormatChoice::Pipe | FormatChoice::Ucsf)
        {
            return Err("--coordinate-columns only applies to text input".to_string());
        }

        Ok(())
    }

    pub fn locator(&self) -> Result<Locator, String> {
        Locator::parse(&self.locator).map_err(|e| e.to_string())
    }

    /// Decoder options implied by these arguments.
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            format: self.format.format(),
            text: TextOptions {
                flavor: self.format.text_flavor(),
                coordinate_columns: self.coordinate_columns,
            },
        }
    }
}

/// Options for `inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the summary as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()
    }
}

/// Options for `export`.
#[derive(Args, Debug, Clone)]
pub struct ExportConfig {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path of the text file to write.
    #[arg(short, long, env = "NMR_OUTPUT")]
    pub output: PathBuf,

    /// Write axis 1 mirrored, as NMRPipe's pipe2txt does.
    #[arg(long, default_value_t = false)]
    pub flip_y: bool,
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.input.validate()?;

        if self.output.as_os_str().is_empty() {
            return Err("Output path is required. Set --output or NMR_OUTPUT".to_string());
        }

        Ok(())
    }

    pub fn output_flavor(&self) -> TextFlavor {
        if self.flip_y {
            TextFlavor::PipeExport
        } else {
            TextFlavor::Plain
        }
    }
}

/// Options for `probe`.
#[derive(Args, Debug, Clone)]
pub struct ProbeConfig {
    /// Input path or file:// URI.
    #[arg(env = "NMR_INPUT")]
    pub locator: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), String> {
        Locator::parse(&self.locator)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

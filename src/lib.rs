//! # NMR Ingest
//!
//! Decoders for nuclear-magnetic-resonance spectrum files.
//!
//! This library turns the on-disk formats written by NMR processing tools
//! into dense, typed, multi-dimensional grids. It reads byte-level headers,
//! works out element kinds and extents, and reconciles each format's
//! coordinate conventions so every decoder hands back the same shape of
//! result.
//!
//! ## Features
//!
//! - **NMRPipe**: byte-order self-detection, named header fields, logical
//!   axis indirection and real/complex/quaternion deinterleaving
//! - **UCSF / Sparky**: tile reassembly with boundary-tile clipping
//! - **Sparse text**: two-pass schema inference and scatter, plus a
//!   `pipe2txt`-style writer
//! - **Format probing**: content-based detection over re-openable sources
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - Data sources (files, `file://` URIs, memory) and endian helpers
//! - [`grid`] - Dense grid container and hypercomplex element types
//! - [`mod@format`] - NMRPipe, UCSF and text decoders plus detection
//! - [`dataset`] - Decoded datasets and provenance
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use nmr_ingest::{read_all_datasets, FileSource, ReadOptions};
//!
//! let source = FileSource::new("hsqc.ft2")?;
//! let bundle = read_all_datasets(&source, &ReadOptions::default())?;
//! for dataset in bundle.iter() {
//!     println!("{} {:?}", dataset.kind(), dataset.extents());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod grid;
pub mod io;

// Re-export commonly used types
pub use config::{Cli, Command, ExportConfig, FormatChoice, InputArgs, InspectConfig, ProbeConfig};
pub use dataset::{
    AxisSummary, DataBundle, Dataset, DatasetSummary, GridData, MetaValue, Provenance, Samples,
};
pub use error::{FormatError, GridError, IoError, PipeError, TextError, UcsfError};
pub use format::pipe::{
    read_pipe, AxisDescriptor, AxisUnit, PipeField, PipeHeader, PipeLayout, HEADER_SIZE,
};
pub use format::text::{
    infer_schema, read_text, write_samples, write_text, TextFlavor, TextOptions, TextSchema,
};
pub use format::ucsf::{read_ucsf, TileAxis, UcsfHeader};
pub use format::{
    detect_format, read_all_datasets, read_dataset, FileFormat, Probe, ReadOptions,
};
pub use grid::{Complex, DenseGrid, Element, ElementKind, Octonion, Quaternion, Real, Scalar};
pub use io::{DataSource, FileSource, Locator, MemorySource};

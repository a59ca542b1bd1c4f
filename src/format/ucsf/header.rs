//! UCSF (Sparky) header parsing.
//!
//! # Layout
//! ```text
//! Bytes   0-9:   "UCSF NMR", NUL padded
//! Byte    10:    dimension count
//! Byte    11:    component count
//! Byte    12:    encoding
//! Byte    13:    version (2)
//! Bytes  14-22:  owner
//! Bytes  23-48:  date
//! Bytes  49-128: comment
//! Bytes 129-179: reserved
//! ```
//!
//! Each declared axis follows as a 128-byte block:
//! ```text
//! Bytes  0-5:   atom label ("1H" if empty)
//! Bytes  6-7:   reserved
//! Bytes  8-11:  point count (i32)
//! Bytes 12-15:  reserved
//! Bytes 16-19:  tile size (i32)
//! Bytes 20-23:  spectrometer frequency, MHz (f32)
//! Bytes 24-27:  spectral width, Hz (f32)
//! Bytes 28-31:  center, ppm (f32)
//! Bytes 32-127: reserved
//! ```
//!
//! Every multi-byte value is big-endian.

use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{AxisSummary, Provenance};
use crate::error::UcsfError;
use crate::grid::ElementKind;
use crate::io::{read_f32_be, read_i32_be};

// =============================================================================
// Constants
// =============================================================================

/// File signature, before NUL padding.
pub const UCSF_MAGIC: &[u8] = b"UCSF NMR";

/// Width of the signature field.
pub const MAGIC_FIELD_SIZE: usize = 10;

/// Size of the fixed preamble.
pub const PREAMBLE_SIZE: usize = 180;

/// Size of one axis block.
pub const AXIS_HEADER_SIZE: usize = 128;

/// Version this decoder was written against.
pub const EXPECTED_VERSION: u8 = 2;

/// Atom label used when the file leaves it blank.
pub const DEFAULT_ATOM: &str = "1H";

/// True if `bytes` starts with the UCSF signature field.
pub fn is_ucsf_magic(bytes: &[u8]) -> bool {
    bytes.len() >= MAGIC_FIELD_SIZE && fixed_string(&bytes[..MAGIC_FIELD_SIZE]).as_bytes() == UCSF_MAGIC
}

/// Decode a NUL-terminated ASCII field.
fn fixed_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

// =============================================================================
// TileAxis
// =============================================================================

/// One stored axis of a UCSF file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileAxis {
    pub atom: String,
    pub points: usize,
    pub tile_size: usize,
    pub spectrometer_mhz: f32,
    pub spectral_width_hz: f32,
    pub center_ppm: f32,
}

impl TileAxis {
    /// Parse a 128-byte axis block for stored axis `axis`.
    pub fn parse(bytes: &[u8], axis: usize) -> Result<Self, UcsfError> {
        if bytes.len() < AXIS_HEADER_SIZE {
            return Err(UcsfError::TooSmall {
                required: AXIS_HEADER_SIZE as u64,
                actual: bytes.len() as u64,
            });
        }

        let mut atom = fixed_string(&bytes[0..6]);
        if atom.is_empty() {
            warn!(axis, "Empty atom label, assuming {}", DEFAULT_ATOM);
            atom = DEFAULT_ATOM.to_string();
        }

        let points = positive(read_i32_be(&bytes[8..12]), axis, "point count")?;
        let tile_size = positive(read_i32_be(&bytes[16..20]), axis, "tile size")?;

        Ok(Self {
            atom,
            points,
            tile_size,
            spectrometer_mhz: read_f32_be(&bytes[20..24]),
            spectral_width_hz: read_f32_be(&bytes[24..28]),
            center_ppm: read_f32_be(&bytes[28..32]),
        })
    }

    /// Tiles along this axis; the last one may be partly padding.
    pub fn tile_count(&self) -> usize {
        self.points.div_ceil(self.tile_size)
    }

    pub fn summary(&self) -> AxisSummary {
        AxisSummary {
            label: self.atom.clone(),
            size: self.points,
            observe_mhz: Some(self.spectrometer_mhz as f64),
            sweep_width_hz: Some(self.spectral_width_hz as f64),
        }
    }
}

fn positive(value: i32, axis: usize, what: &str) -> Result<usize, UcsfError> {
    if value > 0 {
        Ok(value as usize)
    } else {
        Err(UcsfError::InvalidAxis {
            axis,
            message: format!("{} must be positive, got {}", what, value),
        })
    }
}

// =============================================================================
// UcsfHeader
// =============================================================================

/// Parsed UCSF preamble and axis blocks, in stored axis order.
#[derive(Debug, Clone, PartialEq)]
pub struct UcsfHeader {
    pub component_count: u8,
    pub encoding: u8,
    pub version: u8,
    pub owner: String,
    pub date: String,
    pub comment: String,
    pub axes: Vec<TileAxis>,
}

impl UcsfHeader {
    /// Parse the preamble and every axis block.
    ///
    /// # Errors
    /// - `BadMagic` if the signature is missing (callers probing formats
    ///   treat this as "not UCSF")
    /// - `TooSmall` if the preamble or an axis block is truncated
    /// - `BadDimCount` / `UnsupportedComponentCount` for values outside
    ///   1..=4 and 1..=8
    /// - `InvalidAxis` for a non-positive point count or tile size
    pub fn parse(bytes: &[u8]) -> Result<Self, UcsfError> {
        if !is_ucsf_magic(bytes) {
            return Err(UcsfError::BadMagic);
        }
        if bytes.len() < PREAMBLE_SIZE {
            return Err(UcsfError::TooSmall {
                required: PREAMBLE_SIZE as u64,
                actual: bytes.len() as u64,
            });
        }

        let dim_count = bytes[10];
        if !(1..=4).contains(&dim_count) {
            return Err(UcsfError::BadDimCount(dim_count));
        }
        let component_count = bytes[11];
        if !(1..=8).contains(&component_count) {
            return Err(UcsfError::UnsupportedComponentCount(component_count));
        }
        let encoding = bytes[12];
        let version = bytes[13];
        if version != EXPECTED_VERSION {
            warn!(version, "Unexpected UCSF file version");
        }

        let required = Self::size_for(dim_count as usize);
        if bytes.len() < required {
            return Err(UcsfError::TooSmall {
                required: required as u64,
                actual: bytes.len() as u64,
            });
        }

        let axes = (0..dim_count as usize)
            .map(|axis| {
                let start = PREAMBLE_SIZE + axis * AXIS_HEADER_SIZE;
                TileAxis::parse(&bytes[start..start + AXIS_HEADER_SIZE], axis)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let header = Self {
            component_count,
            encoding,
            version,
            owner: fixed_string(&bytes[14..23]),
            date: fixed_string(&bytes[23..49]),
            comment: fixed_string(&bytes[49..129]),
            axes,
        };

        debug!(
            dims = header.dim_count(),
            components = component_count,
            points = ?header.axes.iter().map(|a| a.points).collect::<Vec<_>>(),
            tiles = ?header.axes.iter().map(|a| a.tile_size).collect::<Vec<_>>(),
            "Parsed UCSF header"
        );

        Ok(header)
    }

    /// Header size for a file with `dim_count` axes.
    pub const fn size_for(dim_count: usize) -> usize {
        PREAMBLE_SIZE + dim_count * AXIS_HEADER_SIZE
    }

    pub fn dim_count(&self) -> usize {
        self.axes.len()
    }

    /// Total header size, where the tile payload begins.
    pub fn header_size(&self) -> usize {
        Self::size_for(self.dim_count())
    }

    pub fn element_kind(&self) -> Result<ElementKind, UcsfError> {
        ElementKind::for_component_count(self.component_count as usize)
            .ok_or(UcsfError::UnsupportedComponentCount(self.component_count))
    }

    /// Floats in one tile, components included. `None` on overflow.
    pub fn tile_floats(&self) -> Option<usize> {
        self.axes
            .iter()
            .try_fold(self.component_count as usize, |acc, a| acc.checked_mul(a.tile_size))
    }

    /// Total tiles in the file. `None` on overflow.
    pub fn tile_total(&self) -> Option<usize> {
        self.axes
            .iter()
            .try_fold(1usize, |acc, a| acc.checked_mul(a.tile_count()))
    }

    /// Payload bytes the tile grid requires. `None` on overflow.
    pub fn payload_size(&self) -> Option<u64> {
        (self.tile_total()? as u64)
            .checked_mul(self.tile_floats()? as u64)?
            .checked_mul(4)
    }

    /// Output extents: stored axis `i` becomes output axis `d - 1 - i`.
    pub fn output_extents(&self) -> Vec<usize> {
        self.axes.iter().rev().map(|a| a.points).collect()
    }

    /// Axis summaries in output order.
    pub fn axis_summaries(&self) -> Vec<AxisSummary> {
        self.axes.iter().rev().map(TileAxis::summary).collect()
    }

    pub fn provenance(&self) -> Provenance {
        let mut provenance = Provenance::new();
        provenance.insert_text("owner", self.owner.clone());
        provenance.insert_text("date", self.date.clone());
        provenance.insert_text("comment", self.comment.clone());
        provenance.insert_number("version", self.version as f64);
        for (index, axis) in self.axes.iter().enumerate() {
            let n = index + 1;
            provenance.insert_text(format!("axis {} atom", n), axis.atom.clone());
            provenance.insert_number(
                format!("axis {} spectrometer freq", n),
                axis.spectrometer_mhz as f64,
            );
            provenance.insert_number(
                format!("axis {} spectral width", n),
                axis.spectral_width_hz as f64,
            );
            provenance.insert_number(format!("axis {} center", n), axis.center_ppm as f64);
        }
        provenance
    }
}

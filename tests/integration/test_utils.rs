//! Test utilities for integration tests.
//!
//! This module provides builders for synthetic NMRPipe, UCSF and text files
//! and helpers for putting them on disk.

use std::io::Write;

use tempfile::NamedTempFile;

use nmr_ingest::io::ByteOrder;
use nmr_ingest::{FileSource, PipeField, HEADER_SIZE};

// =============================================================================
// NMRPipe Builder
// =============================================================================

/// Builds an NMRPipe file word by word in a chosen byte order.
pub struct PipeFileBuilder {
    order: ByteOrder,
    words: Vec<u32>,
    data: Vec<f32>,
}

impl PipeFileBuilder {
    /// A header with the byte-order sentinel and default dimension order set.
    pub fn new(order: ByteOrder) -> Self {
        let mut builder = Self {
            order,
            words: vec![0; HEADER_SIZE / 4],
            data: Vec::new(),
        };
        builder
            .float(PipeField::FltOrder, 2.345)
            .float(PipeField::DimOrder1, 2.0)
            .float(PipeField::DimOrder2, 1.0)
            .float(PipeField::DimOrder3, 3.0)
            .float(PipeField::DimOrder4, 4.0);
        builder
    }

    pub fn float(&mut self, field: PipeField, value: f32) -> &mut Self {
        self.words[field.offset()] = value.to_bits();
        self
    }

    pub fn raw_word(&mut self, offset: usize, value: u32) -> &mut Self {
        self.words[offset] = value;
        self
    }

    /// Store `text` as a byte array, so it lands in file order in either byte order.
    pub fn text(&mut self, field: PipeField, text: &str) -> &mut Self {
        let offset = field.offset();
        for (i, chunk) in text.as_bytes().chunks(4).enumerate() {
            let mut quad = [0u8; 4];
            quad[..chunk.len()].copy_from_slice(chunk);
            self.words[offset + i] = self.order.read_u32(&quad);
        }
        self
    }

    /// One-dimensional spectrum of `size` points.
    pub fn one_d(&mut self, size: usize, complex: bool) -> &mut Self {
        self.float(PipeField::DimCount, 1.0)
            .float(PipeField::Size, size as f32)
            .float(PipeField::F2QuadFlag, if complex { 0.0 } else { 1.0 })
            .float(PipeField::QuadFlag, if complex { 0.0 } else { 1.0 })
    }

    /// Real two-dimensional plane of `x` by `y` points.
    pub fn two_d_real(&mut self, x: usize, y: usize) -> &mut Self {
        self.float(PipeField::DimCount, 2.0)
            .float(PipeField::Size, x as f32)
            .float(PipeField::SpecNum, y as f32)
            .float(PipeField::F2QuadFlag, 1.0)
            .float(PipeField::F1QuadFlag, 1.0)
            .float(PipeField::QuadFlag, 1.0)
    }

    pub fn data(&mut self, data: &[f32]) -> &mut Self {
        self.data = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.data.len() * 4);
        for &word in &self.words {
            bytes.extend_from_slice(&self.order.u32_bytes(word));
        }
        for &value in &self.data {
            bytes.extend_from_slice(&self.order.u32_bytes(value.to_bits()));
        }
        bytes
    }
}

// =============================================================================
// UCSF Builder
// =============================================================================

/// One stored axis of a UCSF file.
#[derive(Debug, Clone)]
pub struct UcsfAxisSpec {
    pub atom: &'static str,
    pub points: i32,
    pub tile_size: i32,
    pub spectrometer_mhz: f32,
    pub spectral_width_hz: f32,
    pub center_ppm: f32,
}

impl UcsfAxisSpec {
    pub fn new(atom: &'static str, points: i32, tile_size: i32) -> Self {
        Self {
            atom,
            points,
            tile_size,
            spectrometer_mhz: 600.13,
            spectral_width_hz: 7200.0,
            center_ppm: 4.7,
        }
    }
}

/// UCSF preamble plus axis headers.
pub fn ucsf_header(components: u8, axes: &[UcsfAxisSpec]) -> Vec<u8> {
    let mut bytes = vec![0u8; 180];
    bytes[..8].copy_from_slice(b"UCSF NMR");
    bytes[10] = axes.len() as u8;
    bytes[11] = components;
    bytes[13] = 2;
    bytes[14..20].copy_from_slice(b"sparky");

    for axis in axes {
        let mut block = vec![0u8; 128];
        block[..axis.atom.len()].copy_from_slice(axis.atom.as_bytes());
        block[8..12].copy_from_slice(&axis.points.to_be_bytes());
        block[16..20].copy_from_slice(&axis.tile_size.to_be_bytes());
        block[20..24].copy_from_slice(&axis.spectrometer_mhz.to_be_bytes());
        block[24..28].copy_from_slice(&axis.spectral_width_hz.to_be_bytes());
        block[28..32].copy_from_slice(&axis.center_ppm.to_be_bytes());
        bytes.extend(block);
    }
    bytes
}

/// Value stored at a 2-axis point, unique per stored coordinate.
pub fn ucsf_value(s0: usize, s1: usize) -> f32 {
    (s0 * 100 + s1) as f32 + 0.5
}

/// Tiled big-endian payload for a 2-axis real file. Padding holds NaN.
pub fn ucsf_payload_2d(points: [usize; 2], tiles: [usize; 2]) -> Vec<u8> {
    let counts = [points[0].div_ceil(tiles[0]), points[1].div_ceil(tiles[1])];
    let mut bytes = Vec::new();
    for t0 in 0..counts[0] {
        for t1 in 0..counts[1] {
            for o0 in 0..tiles[0] {
                for o1 in 0..tiles[1] {
                    let s0 = t0 * tiles[0] + o0;
                    let s1 = t1 * tiles[1] + o1;
                    let value = if s0 < points[0] && s1 < points[1] {
                        ucsf_value(s0, s1)
                    } else {
                        f32::NAN
                    };
                    bytes.extend_from_slice(&value.to_be_bytes());
                }
            }
        }
    }
    bytes
}

// =============================================================================
// Files on Disk
// =============================================================================

/// Write bytes to a temporary file and open it as a source.
///
/// The returned guard must outlive the source.
pub fn temp_source(bytes: &[u8], suffix: &str) -> (NamedTempFile, FileSource) {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    let source = FileSource::new(file.path()).expect("open temp file");
    (file, source)
}

/// Render a 2-coordinate text grid, one row per entry.
pub fn text_rows(rows: &[(i64, i64, f64)]) -> String {
    rows.iter()
        .map(|(x, y, v)| format!("{} {} {}\n", x, y, v))
        .collect()
}

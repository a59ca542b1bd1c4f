//! NMRPipe header decoding.
//!
//! The header is 512 words whose byte order is not declared anywhere. It is
//! inferred after the fact from [`PipeField::FltOrder`], which decodes to
//! 2.345 in the writer's order. Once the order is known the words are
//! stored corrected, so every accessor returns logical values regardless of
//! how the file was written.
//!
//! Per-axis fields are addressed by logical axis (1..=4). The dimension-order
//! fields say which physical slot (F1..F4) holds each logical axis; that
//! table is resolved once in [`PipeHeader::parse`].

use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{AxisSummary, Provenance};
use crate::error::PipeError;
use crate::io::ByteOrder;

use super::fields::{
    AxisFields, FieldKind, PipeField, BYTE_ORDER_SENTINEL, BYTE_ORDER_TOLERANCE,
    DIM_ORDER_FIELDS, HEADER_SIZE, HEADER_WORDS,
};

/// Dimension order used when the file's table is unusable.
pub const DEFAULT_DIM_ORDER: [usize; 4] = [2, 1, 3, 4];

// =============================================================================
// AxisUnit
// =============================================================================

/// Unit of an axis' coordinate scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisUnit {
    None,
    Seconds,
    Hertz,
    Ppm,
    Points,
}

impl AxisUnit {
    /// Map the header's unit code. Unknown codes are `None`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => AxisUnit::Seconds,
            2 => AxisUnit::Hertz,
            3 => AxisUnit::Ppm,
            4 => AxisUnit::Points,
            _ => AxisUnit::None,
        }
    }
}

// =============================================================================
// PipeHeader
// =============================================================================

/// A byte-order-corrected NMRPipe header.
#[derive(Clone)]
pub struct PipeHeader {
    words: [u32; HEADER_WORDS],
    byte_order: ByteOrder,
    dim_order: [usize; 4],
}

impl std::fmt::Debug for PipeHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeHeader")
            .field("byte_order", &self.byte_order)
            .field("dim_order", &self.dim_order)
            .finish_non_exhaustive()
    }
}

impl PipeHeader {
    /// Parse the first 2048 bytes of a pipe file.
    ///
    /// # Errors
    /// - `TooSmall` if fewer than 2048 bytes are supplied
    /// - `BadMagic` if word 0 is not zero
    /// - `BadByteOrderMarker` if the sentinel word decodes to NaN
    pub fn parse(bytes: &[u8]) -> Result<Self, PipeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PipeError::TooSmall {
                required: HEADER_SIZE as u64,
                actual: bytes.len() as u64,
            });
        }

        let detected = detect_byte_order(bytes);
        let word_order = detected.unwrap_or(ByteOrder::BigEndian);

        let mut words = [0u32; HEADER_WORDS];
        for (index, word) in words.iter_mut().enumerate() {
            *word = word_order.read_u32(&bytes[index * 4..index * 4 + 4]);
        }

        // Zero reads the same in either order
        let magic = words[PipeField::Magic.offset()];
        if magic != 0 {
            return Err(PipeError::BadMagic(magic));
        }
        let byte_order = detected.ok_or(PipeError::BadByteOrderMarker)?;

        let mut header = Self {
            words,
            byte_order,
            dim_order: DEFAULT_DIM_ORDER,
        };
        header.dim_order = header.resolve_dim_order();

        debug!(
            byte_order = byte_order.name(),
            dim_order = ?header.dim_order,
            "Parsed NMRPipe header"
        );

        Ok(header)
    }

    /// Byte order the file was written in.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Raw corrected word at `offset`.
    pub fn word(&self, offset: usize) -> Option<u32> {
        self.words.get(offset).copied()
    }

    pub fn get_int(&self, field: PipeField) -> i32 {
        self.words[field.offset()] as i32
    }

    pub fn get_float(&self, field: PipeField) -> f32 {
        f32::from_bits(self.words[field.offset()])
    }

    /// Float field truncated toward zero, the way NMRPipe stores counts.
    pub fn get_count(&self, field: PipeField) -> i64 {
        let value = self.get_float(field);
        if value.is_finite() {
            value.trunc() as i64
        } else {
            0
        }
    }

    /// Decode a text field over the number of words the table assigns it.
    pub fn get_packed_string(&self, field: PipeField) -> String {
        let words = match field.kind() {
            FieldKind::Text { words } => words,
            FieldKind::Int | FieldKind::Float => 1,
        };
        self.packed_string(field.offset(), words)
    }

    /// Decode `word_count` words starting at `offset` as packed ASCII.
    ///
    /// Text fields are byte arrays, so each word contributes its bytes in
    /// file order regardless of byte order. The first NUL ends the whole
    /// string, not just the current word.
    pub fn packed_string(&self, offset: usize, word_count: usize) -> String {
        let end = (offset + word_count).min(HEADER_WORDS);
        let start = offset.min(end);
        self.words[start..end]
            .iter()
            .flat_map(|&word| self.byte_order.u32_bytes(word))
            .take_while(|&b| b != 0)
            .map(|b| b as char)
            .collect()
    }

    /// Number of dimensions, validated to 1..=4.
    pub fn dim_count(&self) -> Result<usize, PipeError> {
        let count = self.get_count(PipeField::DimCount);
        if (1..=4).contains(&count) {
            Ok(count as usize)
        } else {
            Err(PipeError::BadDimCount(count))
        }
    }

    /// Physical slot (1..=4) holding logical axis `axis` (1..=4).
    pub fn physical_slot(&self, axis: usize) -> Option<usize> {
        match axis {
            1..=4 => Some(self.dim_order[axis - 1]),
            _ => None,
        }
    }

    /// Per-axis view for logical axis `axis` (1..=4).
    pub fn axis(&self, axis: usize) -> Option<PipeAxis<'_>> {
        let slot = self.physical_slot(axis)?;
        let fields = AxisFields::for_slot(slot)?;
        Some(PipeAxis {
            header: self,
            fields,
            axis,
            slot,
        })
    }

    /// Descriptors for every used logical axis.
    pub fn axis_descriptors(&self) -> Result<Vec<AxisDescriptor>, PipeError> {
        let dims = self.dim_count()?;
        Ok((1..=dims)
            .filter_map(|axis| self.axis(axis))
            .map(|view| view.descriptor())
            .collect())
    }

    /// Descriptive strings and per-axis numbers.
    pub fn provenance(&self) -> Result<Provenance, PipeError> {
        let mut provenance = Provenance::new();
        provenance.insert_text("username", self.get_packed_string(PipeField::UserName));
        provenance.insert_text("operator", self.get_packed_string(PipeField::OperName));
        provenance.insert_text("source", self.get_packed_string(PipeField::SrcName));
        provenance.insert_text("title", self.get_packed_string(PipeField::Title));
        provenance.insert_text("comment", self.get_packed_string(PipeField::Comment));

        for descriptor in self.axis_descriptors()? {
            let n = descriptor.axis;
            provenance.insert_text(format!("dim {} label", n), descriptor.label.clone());
            provenance.insert_number(format!("dim {} sweep width", n), descriptor.sweep_width as f64);
            provenance.insert_number(format!("dim {} obs freq", n), descriptor.obs_freq as f64);
            provenance.insert_number(format!("dim {} origin", n), descriptor.origin as f64);
            provenance.insert_number(format!("dim {} carrier", n), descriptor.carrier as f64);
        }
        Ok(provenance)
    }

    /// Resolve the logical-to-physical slot table.
    ///
    /// The slots of the used axes must be distinct values in 1..=4; unused
    /// axes take the remaining slots in ascending order. Anything else falls
    /// back to [`DEFAULT_DIM_ORDER`].
    fn resolve_dim_order(&self) -> [usize; 4] {
        let raw: Vec<i64> = DIM_ORDER_FIELDS
            .iter()
            .map(|&field| self.get_count(field))
            .collect();
        let used = self.get_count(PipeField::DimCount).clamp(1, 4) as usize;

        let mut order = [0usize; 4];
        let mut taken = [false; 5];
        for (axis, &slot) in raw.iter().take(used).enumerate() {
            if !(1..=4).contains(&slot) || taken[slot as usize] {
                warn!(
                    dim_order = ?raw,
                    default = ?DEFAULT_DIM_ORDER,
                    "Invalid dimension order table, using default"
                );
                return DEFAULT_DIM_ORDER;
            }
            taken[slot as usize] = true;
            order[axis] = slot as usize;
        }

        let mut free = (1..=4).filter(|&slot| !taken[slot]);
        for entry in order.iter_mut().skip(used) {
            *entry = free.next().unwrap_or(0);
        }
        order
    }
}

/// Infer the writer's byte order from the sentinel word.
fn detect_byte_order(bytes: &[u8]) -> Option<ByteOrder> {
    let offset = PipeField::FltOrder.offset() * 4;
    let sentinel = ByteOrder::BigEndian.read_f32(&bytes[offset..offset + 4]);
    if sentinel.is_nan() {
        None
    } else if (sentinel - BYTE_ORDER_SENTINEL).abs() > BYTE_ORDER_TOLERANCE {
        Some(ByteOrder::LittleEndian)
    } else {
        Some(ByteOrder::BigEndian)
    }
}

// =============================================================================
// PipeAxis
// =============================================================================

/// Accessors for one logical axis, resolved to its physical slot.
#[derive(Debug, Clone, Copy)]
pub struct PipeAxis<'a> {
    header: &'a PipeHeader,
    fields: &'static AxisFields,
    axis: usize,
    slot: usize,
}

impl PipeAxis<'_> {
    pub fn logical(&self) -> usize {
        self.axis
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn label(&self) -> String {
        self.header.get_packed_string(self.fields.label)
    }

    pub fn unit(&self) -> AxisUnit {
        AxisUnit::from_code(self.header.get_count(self.fields.units) as i32)
    }

    pub fn origin(&self) -> f32 {
        self.header.get_float(self.fields.orig)
    }

    pub fn sweep_width(&self) -> f32 {
        self.header.get_float(self.fields.sw)
    }

    pub fn obs_freq(&self) -> f32 {
        self.header.get_float(self.fields.obs)
    }

    pub fn carrier(&self) -> f32 {
        self.header.get_float(self.fields.car)
    }

    pub fn center(&self) -> f32 {
        self.header.get_float(self.fields.center)
    }

    pub fn quad_flag(&self) -> i64 {
        self.header.get_count(self.fields.quad_flag)
    }

    /// Quadrature flag 1 means the axis stores real samples only.
    pub fn is_real(&self) -> bool {
        self.quad_flag() == 1
    }

    pub fn ft_flag(&self) -> bool {
        self.header.get_count(self.fields.ft_flag) != 0
    }

    pub fn ft_size(&self) -> i64 {
        self.header.get_count(self.fields.ft_size)
    }

    pub fn td_size(&self) -> i64 {
        self.header.get_count(self.fields.td_size)
    }

    pub fn descriptor(&self) -> AxisDescriptor {
        AxisDescriptor {
            axis: self.axis,
            slot: self.slot,
            label: self.label(),
            unit: self.unit(),
            origin: self.origin(),
            sweep_width: self.sweep_width(),
            obs_freq: self.obs_freq(),
            carrier: self.carrier(),
            center: self.center(),
            real: self.is_real(),
            ft_flag: self.ft_flag(),
            ft_size: self.ft_size(),
            td_size: self.td_size(),
        }
    }
}

/// Metadata for one logical axis of a pipe file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisDescriptor {
    /// Logical axis number (1-based)
    pub axis: usize,
    /// Physical field slot (1 = F1 .. 4 = F4)
    pub slot: usize,
    pub label: String,
    pub unit: AxisUnit,
    pub origin: f32,
    pub sweep_width: f32,
    pub obs_freq: f32,
    /// Carrier position in ppm
    pub carrier: f32,
    pub center: f32,
    /// True if the axis stores real samples only
    pub real: bool,
    /// True if the axis is in the frequency domain
    pub ft_flag: bool,
    pub ft_size: i64,
    pub td_size: i64,
}

impl AxisDescriptor {
    pub fn summary(&self, size: usize) -> AxisSummary {
        AxisSummary {
            label: if self.label.is_empty() {
                format!("dim {}", self.axis)
            } else {
                self.label.clone()
            },
            size,
            observe_mhz: Some(self.obs_freq as f64),
            sweep_width_hz: Some(self.sweep_width as f64),
        }
    }
}

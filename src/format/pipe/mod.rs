//! NMRPipe binary format.
//!
//! A pipe file is a 2048-byte header of 512 words followed by the payload
//! as raw 32-bit floats in the same byte order as the header.
//!
//! # Module structure
//!
//! - [`fields`] - Named header field table (offsets and decode kinds)
//! - [`header`] - Byte-order detection and typed header accessors
//! - [`assemble`] - Data type inference, extents and deinterleaving
//! - `reader` - Whole-file decode from a [`DataSource`](crate::io::DataSource)

pub mod assemble;
pub mod fields;
pub mod header;
mod reader;

pub use assemble::{assemble, data_type, raw_extents, PipeLayout};
pub use fields::{AxisFields, FieldKind, PipeField, HEADER_SIZE, HEADER_WORDS};
pub use header::{AxisDescriptor, AxisUnit, PipeAxis, PipeHeader, DEFAULT_DIM_ORDER};
pub use reader::read_pipe;

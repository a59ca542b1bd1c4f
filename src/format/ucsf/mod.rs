//! UCSF (Sparky) tiled binary format.
//!
//! The payload is a sequence of equally sized tiles. Axis point counts need
//! not be multiples of the tile size, so the last tile along an axis may be
//! partly padding.

mod header;
mod reader;

pub use header::{
    is_ucsf_magic, TileAxis, UcsfHeader, AXIS_HEADER_SIZE, DEFAULT_ATOM, PREAMBLE_SIZE,
    UCSF_MAGIC,
};
pub use reader::{decode_tiles, read_ucsf};

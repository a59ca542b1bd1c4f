//! Sparse coordinate-prefixed text grids.
//!
//! Each non-blank line holds integer coordinates followed by one to eight
//! real values:
//!
//! ```text
//! 1 1  0.25 -0.5
//! 2 1  1.75  0.0
//! ```
//!
//! Rows may come in any order and need not cover every cell. Cells that no
//! row mentions stay zero.

mod reader;
mod schema;
mod writer;

pub use reader::{populate, read_text, TextFlavor, TextOptions};
pub use schema::{infer_schema, TextSchema, MAX_DATA_COLUMNS};
pub use writer::{write_samples, write_text, MAX_WRITTEN_COMPONENTS};

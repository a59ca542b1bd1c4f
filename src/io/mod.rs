mod endian;
mod source;

pub use endian::{read_f32_be, read_i32_be, read_u32_be, read_u32_le, ByteOrder};
pub use source::{read_full, read_prefix, DataSource, FileSource, Locator, MemorySource};

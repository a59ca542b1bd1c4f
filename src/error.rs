use thiserror::Error;

/// I/O errors that can occur when opening or reading an input source
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File or resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// File exists but cannot be read by this process
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Stream ended before the expected number of bytes was read
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },

    /// Any other failure reported by the underlying transport
    #[error("Read error: {0}")]
    Read(String),

    /// Locator is neither a path nor a `file://` URI
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),
}

impl IoError {
    /// Classify a `std::io::Error` raised while accessing `identifier`.
    pub fn from_std(err: std::io::Error, identifier: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => IoError::NotFound(identifier.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                IoError::PermissionDenied(identifier.to_string())
            }
            _ => IoError::Read(format!("{}: {}", identifier, err)),
        }
    }
}

/// Errors raised by the dense grid container
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid needs at least one axis
    #[error("Grid must have at least one axis")]
    EmptyExtents,

    /// Every axis must hold at least one point
    #[error("Axis {axis} has zero extent")]
    ZeroExtent { axis: usize },

    /// Product of the extents does not fit in memory addressing
    #[error("Grid extents overflow the addressable size")]
    Overflow,

    /// Buffer length does not match the product of the extents
    #[error("Buffer holds {actual} elements, extents require {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Coordinate has the wrong number of components
    #[error("Coordinate rank {actual} does not match grid rank {expected}")]
    RankMismatch { expected: usize, actual: usize },

    /// Coordinate lies outside the grid
    #[error("Coordinate {coordinate} out of bounds for axis {axis} (extent {extent})")]
    CoordinateOutOfBounds {
        axis: usize,
        coordinate: usize,
        extent: usize,
    },
}

/// Errors that can occur when decoding NMRPipe files
#[derive(Debug, Clone, Error)]
pub enum PipeError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Grid allocation or addressing failed
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// File is too small to contain the 2048-byte header
    #[error("File too small: need at least {required} bytes, got {actual}")]
    TooSmall { required: u64, actual: u64 },

    /// Payload is not a whole number of 32-bit floats
    #[error("Payload length {length} is not a multiple of 4 bytes")]
    MisalignedLength { length: u64 },

    /// Header word 0 must be zero
    #[error("Invalid magic word: expected 0, got 0x{0:08X}")]
    BadMagic(u32),

    /// The byte-order sentinel decoded to NaN
    #[error("Byte-order marker is NaN: not an NMRPipe file")]
    BadByteOrderMarker,

    /// Dimension count outside 1..=4
    #[error("Invalid dimension count: {0} (expected 1 to 4)")]
    BadDimCount(i64),

    /// Quadrature flags imply neither real, complex nor quaternion data
    #[error("Unsupported point data with {components} components per sample")]
    UnsupportedPointFormat { components: usize },

    /// 3-D and 4-D complex or quaternion data is not interleaved in a known way
    #[error("{kind} data with {dims} dimensions is not supported")]
    UnimplementedHigherDimComplex { kind: &'static str, dims: usize },

    /// Extents implied by the header disagree with the payload length
    #[error("Size mismatch: header implies {expected} floats, payload holds {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

/// Errors that can occur when decoding UCSF (Sparky) files
#[derive(Debug, Clone, Error)]
pub enum UcsfError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Grid allocation or addressing failed
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Header is truncated
    #[error("File too small: need at least {required} bytes, got {actual}")]
    TooSmall { required: u64, actual: u64 },

    /// File does not start with "UCSF NMR"
    #[error("Invalid UCSF magic")]
    BadMagic,

    /// Dimension count outside 1..=4
    #[error("Invalid dimension count: {0} (expected 1 to 4)")]
    BadDimCount(u8),

    /// Component count outside 1..=8
    #[error("Unsupported component count: {0} (expected 1 to 8)")]
    UnsupportedComponentCount(u8),

    /// Axis header holds a non-positive point count or tile size
    #[error("Invalid axis {axis}: {message}")]
    InvalidAxis { axis: usize, message: String },

    /// Tile payload is shorter than the tile grid requires
    #[error("Size mismatch: tiles need {expected} bytes, payload holds {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

/// Errors that can occur when decoding sparse text grids
#[derive(Debug, Clone, Error)]
pub enum TextError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Grid allocation or addressing failed
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// No integer coordinate columns were found
    #[error("No dimension columns found")]
    NoDimensionColumns,

    /// No real-valued data columns were found
    #[error("No data columns found")]
    NoDataColumns,

    /// Data column count outside 1..=8
    #[error("Unsupported component count: {0} (expected 1 to 8)")]
    UnsupportedComponentCount(usize),

    /// Token that should be a number is not
    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    /// Row has a different number of columns than the first row
    #[error("Line {line} has {actual} columns, expected {expected}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// Coordinate span does not fit the grid addressing
    #[error("Coordinate range on column {column} is too large")]
    CoordinateOverflow { column: usize },
}

/// Errors related to format detection and dispatch
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// NMRPipe decoding error
    #[error("NMRPipe error: {0}")]
    Pipe(#[from] PipeError),

    /// UCSF decoding error
    #[error("UCSF error: {0}")]
    Ucsf(#[from] UcsfError),

    /// Text grid decoding error
    #[error("Text error: {0}")]
    Text(#[from] TextError),

    /// File format is not recognized by any decoder
    #[error("Unsupported format: {reason}")]
    UnsupportedFormat { reason: String },
}

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::IoError;

/// Trait for re-openable byte sources.
///
/// Decoders that need to look at a file twice (format probing followed by
/// decoding, or the two-pass text reader) call [`DataSource::open`] once per
/// pass. Every returned reader starts at byte 0 and is released when dropped,
/// so a decode that fails half way through never leaks a handle.
pub trait DataSource {
    /// Open a fresh reader positioned at the start of the resource.
    fn open(&self) -> Result<Box<dyn Read + '_>, IoError>;

    /// Get the total size of the resource in bytes.
    fn size(&self) -> u64;

    /// Get a unique identifier for this resource (for logging and provenance).
    fn identifier(&self) -> &str;
}

// =============================================================================
// Locator
// =============================================================================

/// Where a dataset lives: a filesystem path or a `file://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    path: PathBuf,
    original: String,
}

impl Locator {
    /// Parse a locator string.
    ///
    /// Strings containing `://` are parsed as URIs and must use the `file`
    /// scheme; anything else is taken as a plain path.
    pub fn parse(text: &str) -> Result<Self, IoError> {
        if text.is_empty() {
            return Err(IoError::InvalidLocator("empty locator".to_string()));
        }

        let path = if text.contains("://") {
            let url = Url::parse(text)
                .map_err(|e| IoError::InvalidLocator(format!("{}: {}", text, e)))?;
            if url.scheme() != "file" {
                return Err(IoError::InvalidLocator(format!(
                    "unsupported scheme '{}' in {}",
                    url.scheme(),
                    text
                )));
            }
            url.to_file_path()
                .map_err(|_| IoError::InvalidLocator(format!("not a local file URI: {}", text)))?
        } else {
            PathBuf::from(text)
        };

        Ok(Self {
            path,
            original: text.to_string(),
        })
    }

    /// Filesystem path this locator resolves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The locator exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

// =============================================================================
// FileSource
// =============================================================================

/// A [`DataSource`] backed by a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    identifier: String,
    size: u64,
}

impl FileSource {
    /// Open a file source after pre-flight checks.
    ///
    /// Fails with `NotFound` if the path does not exist and with
    /// `PermissionDenied` if it exists but cannot be opened for reading.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let identifier = path.display().to_string();
        Self::with_identifier(path, identifier)
    }

    /// Open the file a [`Locator`] points to, keeping the locator text as identifier.
    pub fn from_locator(locator: &Locator) -> Result<Self, IoError> {
        Self::with_identifier(locator.path().to_path_buf(), locator.as_str().to_string())
    }

    fn with_identifier(path: PathBuf, identifier: String) -> Result<Self, IoError> {
        let metadata =
            std::fs::metadata(&path).map_err(|e| IoError::from_std(e, &identifier))?;

        if !metadata.is_file() {
            return Err(IoError::Read(format!("{}: not a regular file", identifier)));
        }

        // Probe readability now so permission problems surface before decoding
        File::open(&path).map_err(|e| IoError::from_std(e, &identifier))?;

        debug!(source = %identifier, size = metadata.len(), "Opened file source");

        Ok(Self {
            path,
            identifier,
            size: metadata.len(),
        })
    }
}

impl DataSource for FileSource {
    fn open(&self) -> Result<Box<dyn Read + '_>, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::from_std(e, &self.identifier))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// MemorySource
// =============================================================================

/// A [`DataSource`] over bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    identifier: String,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            identifier: identifier.into(),
        }
    }
}

impl DataSource for MemorySource {
    fn open(&self) -> Result<Box<dyn Read + '_>, IoError> {
        Ok(Box::new(Cursor::new(self.data.as_ref())))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Reading helpers
// =============================================================================

/// Fill `buf` completely from `reader`.
///
/// Unlike `Read::read_exact`, a premature end of stream is reported as
/// `ShortRead` with the number of bytes actually obtained.
pub fn read_full(reader: &mut dyn Read, buf: &mut [u8]) -> Result<(), IoError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(IoError::ShortRead {
                    expected: buf.len() as u64,
                    actual: filled as u64,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(IoError::Read(e.to_string())),
        }
    }
    Ok(())
}

/// Read up to `limit` bytes, stopping early at end of stream.
pub fn read_prefix(reader: &mut dyn Read, limit: usize) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::with_capacity(limit);
    reader
        .take(limit as u64)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Read(e.to_string()))?;
    Ok(buf)
}

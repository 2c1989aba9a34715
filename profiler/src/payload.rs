//! Request payload loading
//!
//! The payload is read once at startup and shared read-only by every work unit.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;

/// Default payload location, relative to the working directory
pub const DEFAULT_PAYLOAD_PATH: &str = "./request.json";

/// Errors that can occur when loading the payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Failed to read payload file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable request body shared by all work units
///
/// Cloning is cheap: the underlying buffer is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Bytes,
}

impl Payload {
    /// Load the payload from a file.
    ///
    /// Lines are concatenated with no separator, so every `\n`, `\r\n` and
    /// `\r` terminator is dropped from the body. Whitespace-sensitive
    /// multi-line JSON is not protected from this.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PayloadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_text(&text))
    }

    /// Build a payload from text, joining its lines with no separator
    pub fn from_text(text: &str) -> Self {
        let joined: String = text.split(['\r', '\n']).collect();
        Self {
            bytes: Bytes::from(joined),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Body for one request (shares the buffer, no copy)
    pub fn to_body(&self) -> Bytes {
        self.bytes.clone()
    }
}

use std::borrow::Cow;
use std::path::PathBuf;

use serde::Serialize;

/// Reference to an image picked by the user, not yet encoded.
///
/// Serializable so validation errors can report the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImageSource {
    /// Image content already held in memory, e.g. a multipart upload.
    Bytes(Vec<u8>),
    /// Image file on the local filesystem.
    Path(PathBuf),
}

impl ImageSource {
    /// Loads the raw (still encoded) image content.
    pub fn load(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match self {
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Self::Path(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

use std::path::{Path, PathBuf};

use crate::domain::types::{BlobPath, ImageUrl};
use crate::storage::{BlobStore, StorageError, StorageResult, StoredBlob, join_public_url};

/// Blob store writing objects below a directory on the local filesystem.
///
/// The directory is expected to be served under `public_url`, which the
/// application does with `actix-files`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl AsRef<Path>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_url: public_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path component of the absolute public URL, where the root has to be
    /// served.
    pub fn mount_path(&self) -> &str {
        let without_scheme = self
            .public_url
            .split_once("://")
            .map_or("", |(_, rest)| rest);
        match without_scheme.find('/') {
            Some(start) => match without_scheme[start..].trim_end_matches('/') {
                "" => "/",
                path => path,
            },
            None => "/",
        }
    }

    fn file_path(&self, path: &BlobPath) -> PathBuf {
        self.root.join(path.as_str())
    }
}

impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<StoredBlob> {
        let file_path = self.file_path(path);
        let io_error = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let size = bytes.len();
        tokio::fs::write(&file_path, bytes).await.map_err(io_error)?;

        log::debug!("Stored {size} bytes at {}", file_path.display());

        Ok(StoredBlob {
            path: path.clone(),
            size,
        })
    }

    async fn public_url(&self, blob: &StoredBlob) -> StorageResult<ImageUrl> {
        join_public_url(&self.public_url, &blob.path)
    }
}

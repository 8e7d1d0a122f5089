//! Blob storage for product images.
//!
//! A [`BlobStore`] accepts bytes at a path and can later resolve a publicly
//! fetchable URL for what it stored. The concrete backend is chosen from
//! configuration through [`Storage`].

use thiserror::Error;

use crate::domain::types::{BlobPath, ImageUrl, TypeConstraintError};
use crate::models::config::StorageConfig;

pub mod local;
pub mod s3;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write blob {path}: {source}")]
    Io {
        path: BlobPath,
        #[source]
        source: std::io::Error,
    },
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("invalid public url: {0}")]
    InvalidUrl(#[from] TypeConstraintError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Handle to an object written by [`BlobStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub path: BlobPath,
    pub size: usize,
}

/// Object storage addressed by path.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Store `bytes` at `path`, replacing any existing object.
    async fn put(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<StoredBlob>;

    /// Resolve a URL clients can fetch the stored object from.
    async fn public_url(&self, blob: &StoredBlob) -> StorageResult<ImageUrl>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    async fn put(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<StoredBlob> {
        (**self).put(path, bytes).await
    }

    async fn public_url(&self, blob: &StoredBlob) -> StorageResult<ImageUrl> {
        (**self).public_url(blob).await
    }
}

/// Joins a base URL and a blob path with exactly one slash between them.
pub(crate) fn join_public_url(base: &str, path: &BlobPath) -> StorageResult<ImageUrl> {
    let url = format!("{}/{}", base.trim_end_matches('/'), path.as_str());
    Ok(ImageUrl::new(url)?)
}

/// Storage backend selected by configuration.
pub enum Storage {
    Local(LocalBlobStore),
    S3(S3BlobStore),
}

impl Storage {
    /// Build the configured backend. Public base URLs must be absolute.
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        match config {
            StorageConfig::Local { root, public_url } => {
                ImageUrl::new(public_url.as_str())?;
                Ok(Self::Local(LocalBlobStore::new(root, public_url.clone())))
            }
            StorageConfig::S3 {
                bucket,
                region,
                endpoint_url,
                public_url,
                presign_ttl_secs,
            } => {
                if let Some(public_url) = public_url {
                    ImageUrl::new(public_url.as_str())?;
                }
                Ok(Self::S3(
                    S3BlobStore::connect(
                        bucket.clone(),
                        region.clone(),
                        endpoint_url.clone(),
                        public_url.clone(),
                        *presign_ttl_secs,
                    )
                    .await,
                ))
            }
        }
    }
}

impl BlobStore for Storage {
    async fn put(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<StoredBlob> {
        match self {
            Self::Local(store) => store.put(path, bytes).await,
            Self::S3(store) => store.put(path, bytes).await,
        }
    }

    async fn public_url(&self, blob: &StoredBlob) -> StorageResult<ImageUrl> {
        match self {
            Self::Local(store) => store.public_url(blob).await,
            Self::S3(store) => store.public_url(blob).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_urls_without_double_slashes() {
        let path = BlobPath::product_image("abc");
        let url = join_public_url("https://cdn.example.com/media/", &path).unwrap();
        assert_eq!(url, "https://cdn.example.com/media/products/images/abc");
    }

    #[tokio::test]
    async fn local_storage_requires_absolute_public_url() {
        let config = StorageConfig::Local {
            root: "./media".into(),
            public_url: "/static/uploads".into(),
        };
        assert!(matches!(
            Storage::from_config(&config).await,
            Err(StorageError::InvalidUrl(_))
        ));

        let config = StorageConfig::Local {
            root: "./media".into(),
            public_url: "http://localhost:8080/media".into(),
        };
        assert!(matches!(
            Storage::from_config(&config).await,
            Ok(Storage::Local(_))
        ));
    }

    #[tokio::test]
    async fn s3_storage_requires_absolute_public_url() {
        let config = StorageConfig::S3 {
            bucket: "products".into(),
            region: Some("us-east-1".into()),
            endpoint_url: None,
            public_url: Some("cdn/products".into()),
            presign_ttl_secs: 60,
        };
        assert!(matches!(
            Storage::from_config(&config).await,
            Err(StorageError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_invalid_base_urls() {
        let path = BlobPath::product_image("abc");
        assert!(matches!(
            join_public_url("not a url", &path),
            Err(StorageError::InvalidUrl(_))
        ));
    }
}

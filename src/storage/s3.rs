use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

use crate::domain::types::{BlobPath, ImageUrl};
use crate::images::JPEG_CONTENT_TYPE;
use crate::storage::{BlobStore, StorageError, StorageResult, StoredBlob, join_public_url};

/// Blob store backed by an S3 bucket.
///
/// When `public_url` is set (a CDN or a public bucket endpoint) object URLs
/// are built from it; otherwise a presigned GET URL is issued.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    public_url: Option<String>,
    presign_ttl: Duration,
}

impl S3BlobStore {
    pub fn new(
        client: S3Client,
        bucket: String,
        public_url: Option<String>,
        presign_ttl: Duration,
    ) -> Self {
        Self {
            client,
            bucket,
            public_url,
            presign_ttl,
        }
    }

    /// Build a client from the default AWS credential chain.
    ///
    /// A custom `endpoint_url` switches to path-style addressing so that
    /// S3-compatible servers work.
    pub async fn connect(
        bucket: String,
        region: Option<String>,
        endpoint_url: Option<String>,
        public_url: Option<String>,
        presign_ttl_secs: u64,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint_url) = &endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let shared_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(endpoint_url.is_some())
            .build();
        let client = S3Client::from_conf(s3_config);

        log::info!("S3 blob store initialized for bucket {bucket}");

        Self::new(
            client,
            bucket,
            public_url,
            Duration::from_secs(presign_ttl_secs),
        )
    }
}

impl BlobStore for S3BlobStore {
    async fn put(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<StoredBlob> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path.as_str())
            .body(ByteStream::from(bytes))
            .content_type(JPEG_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                log::error!("S3 upload of {path} failed: {}", DisplayErrorContext(&e));
                StorageError::Backend(format!("upload of {path} failed: {e}"))
            })?;

        Ok(StoredBlob {
            path: path.clone(),
            size,
        })
    }

    async fn public_url(&self, blob: &StoredBlob) -> StorageResult<ImageUrl> {
        if let Some(base) = &self.public_url {
            return join_public_url(base, &blob.path);
        }

        let presigning = PresigningConfig::expires_in(self.presign_ttl)
            .map_err(|e| StorageError::Backend(format!("invalid presigning config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(blob.path.as_str())
            .presigned(presigning)
            .await
            .map_err(|e| {
                StorageError::Backend(format!(
                    "failed to presign {}: {}",
                    blob.path,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(ImageUrl::new(presigned.uri().to_string())?)
    }
}

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::product::SavedProduct;
use crate::domain::status::SubmissionStatus;
use crate::domain::types::{BlobPath, DocumentId, ImageUrl};
use crate::dto::products::{ProductDto, ProductPageDto};
use crate::forms::products::{ProductForm, ProductFormError, ProductFormPayload};
use crate::images::{ImageEncodeError, encode_all};
use crate::repository::errors::RepositoryError;
use crate::repository::{ProductListQuery, ProductReader, ProductWriter};
use crate::storage::{BlobStore, StorageError, StorageResult};

use super::{ServiceError, ServiceResult};

pub const PRODUCTS_PER_PAGE: usize = 20;

/// Why a product submission did not complete.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required input is missing or malformed; nothing was started.
    #[error(transparent)]
    Validation(#[from] ProductFormError),
    /// Image `index` could not be converted to JPEG.
    #[error("failed to encode image {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: ImageEncodeError,
    },
    /// Image `index` could not be stored at `path`.
    #[error("failed to upload image {index} to {path}: {source}")]
    Upload {
        index: usize,
        path: BlobPath,
        #[source]
        source: StorageError,
    },
    /// The product document could not be written.
    #[error("failed to save product: {0}")]
    Persist(#[from] RepositoryError),
}

/// Runs the compose, upload and persist workflow for product forms.
///
/// Progress is published on a watch channel: `Loading` from the moment a
/// valid form is accepted until the result callback has run, then
/// `Succeeded` or `Failed`.
pub struct ProductSubmitter<'a, S, R> {
    storage: &'a S,
    repo: &'a R,
    status: watch::Sender<SubmissionStatus>,
}

impl<'a, S, R> ProductSubmitter<'a, S, R>
where
    S: BlobStore,
    R: ProductWriter,
{
    pub fn new(storage: &'a S, repo: &'a R) -> Self {
        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            storage,
            repo,
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    /// Validate the form, upload its images and write the product.
    ///
    /// Validation failures return early without touching the status or
    /// calling `on_result`. Past validation, `on_result` is called exactly
    /// once with the outcome. Images that were uploaded before another upload
    /// failed are left in storage.
    pub async fn submit<F>(
        &self,
        form: ProductForm,
        on_result: F,
    ) -> Result<SavedProduct, SubmitError>
    where
        F: FnOnce(bool),
    {
        let payload = match ProductFormPayload::try_from(form) {
            Ok(payload) => payload,
            Err(e) => {
                log::info!("Rejected product form: {e}");
                return Err(e.into());
            }
        };

        self.status.send_replace(SubmissionStatus::Loading);

        let result = self.save(payload).await;

        match &result {
            Ok(saved) => {
                log::info!(
                    "Saved product {} as document {} with {} image(s)",
                    saved.product.id,
                    saved.document_id,
                    saved.product.image_urls.len()
                );
                on_result(true);
                self.status.send_replace(SubmissionStatus::Succeeded);
            }
            Err(e) => {
                log::error!("Failed to submit product: {e}");
                on_result(false);
                self.status.send_replace(SubmissionStatus::Failed);
            }
        }

        result
    }

    async fn save(&self, mut payload: ProductFormPayload) -> Result<SavedProduct, SubmitError> {
        let images = std::mem::take(&mut payload.images);
        let buffers = encode_all(images)
            .await
            .map_err(|(index, source)| SubmitError::Encode { index, source })?;

        let image_urls = self.upload_images(buffers).await?;

        let product = payload.into_product(image_urls);
        let document_id = self.repo.add_product(&product)?;

        Ok(SavedProduct {
            document_id,
            product,
        })
    }

    /// Upload all buffers concurrently and wait for every one of them.
    ///
    /// URLs come back in the order of `buffers`. On failure the error of the
    /// lowest failing index is returned.
    async fn upload_images(&self, buffers: Vec<Vec<u8>>) -> Result<Vec<ImageUrl>, SubmitError> {
        let uploads = buffers
            .into_iter()
            .enumerate()
            .map(move |(index, bytes)| async move {
                let path = BlobPath::for_new_product_image();
                let result = self.upload_image(&path, bytes).await;
                (index, path, result)
            });

        let mut urls = Vec::new();
        let mut uploaded = Vec::new();
        let mut failure = None;

        for (index, path, result) in join_all(uploads).await {
            match result {
                Ok(url) => {
                    urls.push(url);
                    uploaded.push(path);
                }
                Err(source) => {
                    log::error!("Upload of image {index} to {path} failed: {source}");
                    if failure.is_none() {
                        failure = Some(SubmitError::Upload {
                            index,
                            path,
                            source,
                        });
                    }
                }
            }
        }

        match failure {
            Some(err) => {
                if !uploaded.is_empty() {
                    let paths = uploaded
                        .iter()
                        .map(BlobPath::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    log::warn!("Images left in storage after failed submit: {paths}");
                }
                Err(err)
            }
            None => Ok(urls),
        }
    }

    async fn upload_image(&self, path: &BlobPath, bytes: Vec<u8>) -> StorageResult<ImageUrl> {
        let blob = self.storage.put(path, bytes).await?;
        self.storage.public_url(&blob).await
    }
}

/// Core business logic for listing saved products.
pub fn show_products<R>(page: usize, repo: &R) -> ServiceResult<ProductPageDto>
where
    R: ProductReader,
{
    let page = page.max(1);
    match repo.list_products(ProductListQuery::default().paginate(page, PRODUCTS_PER_PAGE)) {
        Ok((total, products)) => Ok(ProductPageDto {
            products: products.into_iter().map(ProductDto::from).collect(),
            page,
            total_pages: total.div_ceil(PRODUCTS_PER_PAGE),
            total,
        }),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single saved product by document id.
pub fn show_product<R>(document_id: &str, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader,
{
    let document_id = DocumentId::new(document_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_product(&document_id) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product {document_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

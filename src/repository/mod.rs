use crate::db::{DbConnection, DbPool};
use crate::domain::product::{Product, StoredProduct};
use crate::domain::types::DocumentId;

use errors::RepositoryResult;

pub mod errors;
pub mod product;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Page selection for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Query parameters used when listing stored products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations over the products collection.
pub trait ProductReader {
    /// List products newest first, returning the total count alongside the page.
    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<StoredProduct>)>;
    /// Retrieve a product by the id of its document.
    fn get_product(&self, id: &DocumentId) -> RepositoryResult<Option<StoredProduct>>;
}

/// Write operations over the products collection.
pub trait ProductWriter {
    /// Add the product as a new document and return the generated document id.
    fn add_product(&self, product: &Product) -> RepositoryResult<DocumentId>;
}

impl<T: ProductWriter + ?Sized> ProductWriter for &T {
    fn add_product(&self, product: &Product) -> RepositoryResult<DocumentId> {
        (**self).add_product(product)
    }
}

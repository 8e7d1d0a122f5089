use chrono::Utc;
use diesel::prelude::*;

use crate::domain::product::{PRODUCTS_COLLECTION, Product, StoredProduct};
use crate::domain::types::DocumentId;
use crate::models::document::{Document as DbDocument, NewDocument as DbNewDocument};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<StoredProduct>)> {
        use crate::schema::documents;

        let mut conn = self.conn()?;

        let query_builder = || {
            documents::table
                .filter(documents::collection.eq(PRODUCTS_COLLECTION))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        // Apply pagination if requested
        if let Some(pagination) = &query.pagination {
            let offset = (pagination.page.max(1) - 1).saturating_mul(pagination.per_page);
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order((documents::created_at.desc(), documents::id.asc()))
            .load::<DbDocument>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<StoredProduct>, _>>()?;

        Ok((total, items))
    }

    fn get_product(&self, id: &DocumentId) -> RepositoryResult<Option<StoredProduct>> {
        use crate::schema::documents;

        let mut conn = self.conn()?;

        let document = documents::table
            .filter(documents::id.eq(id.as_str()))
            .filter(documents::collection.eq(PRODUCTS_COLLECTION))
            .first::<DbDocument>(&mut conn)
            .optional()?;

        let product = document.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductWriter for DieselRepository {
    fn add_product(&self, product: &Product) -> RepositoryResult<DocumentId> {
        use crate::schema::documents;

        let mut conn = self.conn()?;

        let id = DocumentId::generate();
        let document = DbNewDocument::for_product(&id, product, Utc::now().naive_utc())?;

        diesel::insert_into(documents::table)
            .values(&document)
            .execute(&mut conn)?;

        Ok(id)
    }
}

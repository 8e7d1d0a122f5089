use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{PRODUCTS_COLLECTION, Product, StoredProduct};
use crate::domain::types::DocumentId;
use crate::repository::errors::RepositoryError;

/// Diesel model representing the `documents` table.
///
/// Each row is one schemaless document: `data` holds the JSON body and
/// `collection` names the logical collection it belongs to.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::documents)]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub data: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Document`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocument {
    pub id: String,
    pub collection: String,
    pub data: String,
    pub created_at: NaiveDateTime,
}

impl NewDocument {
    /// Serializes a product into a new document of the products collection.
    pub fn for_product(
        id: &DocumentId,
        product: &Product,
        created_at: NaiveDateTime,
    ) -> Result<Self, RepositoryError> {
        Ok(Self {
            id: id.as_str().to_string(),
            collection: PRODUCTS_COLLECTION.to_string(),
            data: serde_json::to_string(product)?,
            created_at,
        })
    }
}

impl TryFrom<Document> for StoredProduct {
    type Error = RepositoryError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            document_id: DocumentId::new(document.id)?,
            product: serde_json::from_str(&document.data)?,
            created_at: document.created_at,
        })
    }
}

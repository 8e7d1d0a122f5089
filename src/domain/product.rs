use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    DocumentId, ImageUrl, OfferPercentage, ProductCategory, ProductColor, ProductDescription,
    ProductId, ProductName, ProductPrice,
};

/// Name of the document collection products are written to.
pub const PRODUCTS_COLLECTION: &str = "Products";

/// A product as persisted in the document store.
///
/// Field names match the stored document layout, so `image_urls` is written
/// as `images`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub category: ProductCategory,
    pub price: ProductPrice,
    pub offer_percentage: Option<OfferPercentage>,
    pub description: Option<ProductDescription>,
    pub colors: Vec<ProductColor>,
    pub sizes: Option<Vec<String>>,
    #[serde(rename = "images")]
    pub image_urls: Vec<ImageUrl>,
}

/// Outcome of a successful submit: the written product and its document id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SavedProduct {
    pub document_id: DocumentId,
    pub product: Product,
}

/// A product read back from the store together with document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProduct {
    pub document_id: DocumentId,
    pub product: Product,
    pub created_at: NaiveDateTime,
}

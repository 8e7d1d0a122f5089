use serde::Serialize;

use crate::domain::product::StoredProduct;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorDto {
    /// Hex of the ARGB value, as shown next to the swatch.
    pub hex: String,
    pub css: String,
}

/// Flattened product used by templates and the listing API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub document_id: String,
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub offer_percentage: Option<f64>,
    pub description: Option<String>,
    pub colors: Vec<ColorDto>,
    pub sizes: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: String,
}

impl From<StoredProduct> for ProductDto {
    fn from(value: StoredProduct) -> Self {
        let product = value.product;
        Self {
            document_id: value.document_id.into_inner(),
            id: product.id.into_inner(),
            name: product.name.into_inner(),
            category: product.category.into_inner(),
            price: product.price.get(),
            offer_percentage: product.offer_percentage.map(|o| o.get()),
            description: product.description.map(|d| d.into_inner()),
            colors: product
                .colors
                .into_iter()
                .map(|c| ColorDto {
                    hex: c.to_string(),
                    css: c.to_css(),
                })
                .collect(),
            sizes: product.sizes.unwrap_or_default(),
            image_urls: product.image_urls.into_iter().map(String::from).collect(),
            created_at: value.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPageDto {
    pub products: Vec<ProductDto>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

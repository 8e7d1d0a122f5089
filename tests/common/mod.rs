//! Helpers for integration tests.

#![allow(dead_code)]

use diesel_migrations::MigrationHarness;
use product_adder::db::{DbPool, MIGRATIONS, establish_connection_pool};
use product_adder::domain::product::Product;
use product_adder::domain::types::{
    ImageUrl, ProductCategory, ProductColor, ProductId, ProductName, ProductPrice,
};
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn sample_product(name: &str) -> Product {
    Product {
        id: ProductId::generate(),
        name: ProductName::new(name).expect("valid name"),
        category: ProductCategory::new("Apparel").expect("valid category"),
        price: ProductPrice::new(19.99).expect("valid price"),
        offer_percentage: None,
        description: None,
        colors: vec![ProductColor::from_hex("#FF0000").expect("valid color")],
        sizes: Some(vec!["S".to_string(), "M".to_string()]),
        image_urls: vec![
            ImageUrl::new("https://blobs.test/products/images/a").expect("valid url"),
        ],
    }
}

/// Encode a solid PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("PNG encoding");
    bytes.into_inner()
}

//! Domain entities and value objects shared by every layer.

pub mod image;
pub mod product;
pub mod status;
pub mod types;

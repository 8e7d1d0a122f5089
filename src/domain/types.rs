//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateUrl;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A numeric value was infinite or NaN.
    #[error("{0} must be a finite number")]
    NonFiniteNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// A color was not a 6 or 8 digit hex value.
    #[error("invalid color: {0}")]
    InvalidColor(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Macro to generate opaque UUID-backed identifiers.
///
/// Identifiers are stored as their hyphenated string form so documents stay
/// readable by any consumer of the store.
macro_rules! uuid_id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier, rejecting empty values.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! url_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed URL and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if !trimmed.as_str().validate_url() {
                    return Err(TypeConstraintError::InvalidUrl($field));
                }
                Ok(Self(trimmed))
            }

            /// Borrow the URL as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned URL.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! finite_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Constructs a numeric value, rejecting NaN and infinities.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonFiniteNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }
    };
}

uuid_id_newtype!(ProductId, "Unique identifier for a product.", "product id");
uuid_id_newtype!(
    DocumentId,
    "Identifier assigned to a document by the store.",
    "document id"
);

non_empty_string_newtype!(
    ProductName,
    "Product name enforcing non-empty values.",
    "product name"
);
non_empty_string_newtype!(
    ProductCategory,
    "Product category enforcing non-empty values.",
    "category"
);
non_empty_string_newtype!(
    ProductDescription,
    "Product description enforcing non-empty values.",
    "description"
);

url_string_newtype!(ImageUrl, "Publicly fetchable product image URL.", "image url");

finite_f64_newtype!(
    ProductPrice,
    "Price in standard currency units.",
    "price"
);
finite_f64_newtype!(
    OfferPercentage,
    "Discount applied to the product price, in percent.",
    "offer percentage"
);

/// Integer-encoded ARGB color, matching the layout used by color pickers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductColor(i32);

impl ProductColor {
    pub const fn new(argb: i32) -> Self {
        Self(argb)
    }

    /// Parses `#RRGGBB` or `#AARRGGBB`. Colors without alpha are opaque.
    pub fn from_hex(value: &str) -> Result<Self, TypeConstraintError> {
        let digits = value.trim().trim_start_matches('#');
        let invalid = || TypeConstraintError::InvalidColor(value.trim().to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let argb = match digits.len() {
            6 => 0xFF00_0000 | u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
            8 => u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        Ok(Self(argb as i32))
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// `#RRGGBB` form suitable for HTML color swatches.
    pub fn to_css(self) -> String {
        format!("#{:06x}", (self.0 as u32) & 0x00FF_FFFF)
    }
}

impl Display for ProductColor {
    /// Lowercase hex of the unsigned value, no padding.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.0 as u32)
    }
}

impl From<i32> for ProductColor {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<ProductColor> for i32 {
    fn from(value: ProductColor) -> Self {
        value.0
    }
}

/// Location of an object inside blob storage, e.g. `products/images/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BlobPath(String);

impl BlobPath {
    pub const PRODUCT_IMAGES_PREFIX: &'static str = "products/images";

    /// Path for a product image stored under a freshly generated identifier.
    pub fn for_new_product_image() -> Self {
        Self::product_image(&Uuid::new_v4().to_string())
    }

    pub fn product_image(id: &str) -> Self {
        Self(format!("{}/{id}", Self::PRODUCT_IMAGES_PREFIX))
    }

    /// Accepts relative paths made of non-empty segments without `.`/`..`.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = trim_and_require_non_empty(value, "blob path")?;
        let valid = !value.starts_with('/')
            && value
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if valid {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidValue(format!("blob path: {value}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BlobPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BlobPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = NonEmptyString::new("  product  ").unwrap();
        assert_eq!(value.as_str(), "product");
    }

    #[test]
    fn rejects_blank_names() {
        let err = ProductName::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("product name"));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ProductId::generate(), ProductId::generate());
    }

    #[test]
    fn validates_urls() {
        let url = ImageUrl::new("https://cdn.example.com/products/images/1").unwrap();
        assert_eq!(url, "https://cdn.example.com/products/images/1");
        let err = ImageUrl::new("not-a-url").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidUrl("image url"));
    }

    #[test]
    fn product_price_allows_zero() {
        assert_eq!(ProductPrice::new(0.0).unwrap().get(), 0.0);
    }

    #[test]
    fn product_price_keeps_negative_values() {
        assert_eq!(ProductPrice::new(-5.0).unwrap().get(), -5.0);
        assert_eq!(OfferPercentage::new(-10.0).unwrap(), -10.0);
    }

    #[test]
    fn product_price_rejects_non_finite_values() {
        assert_eq!(
            ProductPrice::new(f64::NAN).unwrap_err(),
            TypeConstraintError::NonFiniteNumber("price")
        );
        assert!(ProductPrice::new(f64::INFINITY).is_err());
    }

    #[test]
    fn parses_rgb_colors_as_opaque() {
        let color = ProductColor::from_hex("#ff0000").unwrap();
        assert_eq!(color.get(), 0xFFFF0000_u32 as i32);
        assert_eq!(color.to_string(), "ffff0000");
        assert_eq!(color.to_css(), "#ff0000");
    }

    #[test]
    fn parses_argb_colors() {
        let color = ProductColor::from_hex("80112233").unwrap();
        assert_eq!(color.get(), 0x80112233_u32 as i32);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(ProductColor::from_hex("#fff").is_err());
        assert!(ProductColor::from_hex("#gg0000").is_err());
        assert!(ProductColor::from_hex("+12345").is_err());
    }

    #[test]
    fn product_image_paths_use_images_prefix() {
        let path = BlobPath::for_new_product_image();
        assert!(path.as_str().starts_with("products/images/"));
        assert_ne!(path, BlobPath::for_new_product_image());
    }

    #[test]
    fn blob_paths_reject_traversal() {
        assert!(BlobPath::new("products/images/abc").is_ok());
        assert!(BlobPath::new("../etc/passwd").is_err());
        assert!(BlobPath::new("/abs").is_err());
        assert!(BlobPath::new("a//b").is_err());
    }
}

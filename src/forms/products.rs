use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::image::ImageSource;
use crate::domain::product::Product;
use crate::domain::types::{
    ImageUrl, OfferPercentage, ProductCategory, ProductColor, ProductDescription, ProductId,
    ProductName, ProductPrice, TypeConstraintError,
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Split a comma separated size list into trimmed tokens.
///
/// Returns `None` when the input is empty after trimming.
pub fn parse_sizes(sizes: &str) -> Option<Vec<String>> {
    let sizes = sizes.trim();
    if sizes.is_empty() {
        return None;
    }
    Some(sizes.split(',').map(|s| s.trim().to_string()).collect())
}

/// Raw product input as entered by the user.
///
/// Text fields are kept exactly as typed; colors and images accumulate as the
/// user picks them.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub price: String,
    pub offer_percentage: String,
    pub description: String,
    pub sizes: String,
    pub selected_colors: Vec<ProductColor>,
    #[validate(length(min = 1))]
    pub selected_images: Vec<ImageSource>,
}

impl ProductForm {
    pub fn add_color(&mut self, color: ProductColor) {
        self.selected_colors.push(color);
    }

    pub fn add_image(&mut self, image: ImageSource) {
        self.selected_images.push(image);
    }

    pub fn add_images(&mut self, images: impl IntoIterator<Item = ImageSource>) {
        self.selected_images.extend(images);
    }

    /// True when at least one image is selected and name, category and price
    /// are filled in.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Trimmed and typed form content, ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub category: ProductCategory,
    pub price: ProductPrice,
    pub offer_percentage: Option<OfferPercentage>,
    pub description: Option<ProductDescription>,
    pub colors: Vec<ProductColor>,
    pub sizes: Option<Vec<String>>,
    pub images: Vec<ImageSource>,
}

impl ProductFormPayload {
    /// Build the product record under a fresh id.
    pub fn into_product(self, image_urls: Vec<ImageUrl>) -> Product {
        Product {
            id: ProductId::generate(),
            name: self.name,
            category: self.category,
            price: self.price,
            offer_percentage: self.offer_percentage,
            description: self.description,
            colors: self.colors,
            sizes: self.sizes,
            image_urls,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("{field} is not a number: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Failed to read uploaded image: {0}")]
    ImageRead(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl From<std::io::Error> for ProductFormError {
    fn from(value: std::io::Error) -> Self {
        Self::ImageRead(value.to_string())
    }
}

/// Parse any finite float; "NaN" and "inf" count as unparseable.
fn parse_number(field: &'static str, value: &str) -> Result<f64, ProductFormError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ProductFormError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let offer_percentage = value.offer_percentage.trim();
        let offer_percentage = if offer_percentage.is_empty() {
            None
        } else {
            Some(OfferPercentage::new(parse_number(
                "offer percentage",
                offer_percentage,
            )?)?)
        };

        let description = value.description.trim();
        let description = if description.is_empty() {
            None
        } else {
            Some(ProductDescription::new(description)?)
        };

        Ok(Self {
            name: ProductName::new(value.name)?,
            category: ProductCategory::new(value.category)?,
            price: ProductPrice::new(parse_number("price", value.price.trim())?)?,
            offer_percentage,
            description,
            colors: value.selected_colors,
            sizes: parse_sizes(&value.sizes),
            images: value.selected_images,
        })
    }
}

/// Multipart body of the product submission endpoints.
///
/// Every field is optional at the transport level so that missing input is
/// reported by form validation instead of a bare 400.
#[derive(MultipartForm)]
pub struct UploadProductForm {
    pub name: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub price: Option<Text<String>>,
    pub offer_percentage: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub sizes: Option<Text<String>>,
    pub colors: Vec<Text<String>>,
    #[multipart(limit = "20MB")]
    pub images: Vec<TempFile>,
}

fn text(value: Option<Text<String>>) -> String {
    value.map(Text::into_inner).unwrap_or_default()
}

impl UploadProductForm {
    /// Collect the multipart fields into a [`ProductForm`].
    ///
    /// Empty file parts (a file input left blank) and blank colors are skipped.
    pub fn into_product_form(self) -> Result<ProductForm, ProductFormError> {
        let mut form = ProductForm {
            name: text(self.name),
            category: text(self.category),
            price: text(self.price),
            offer_percentage: text(self.offer_percentage),
            description: text(self.description),
            sizes: text(self.sizes),
            ..ProductForm::default()
        };

        for color in self.colors {
            let color = color.into_inner();
            if color.trim().is_empty() {
                continue;
            }
            form.add_color(ProductColor::from_hex(&color)?);
        }

        for mut image in self.images {
            if image.size == 0 {
                continue;
            }
            let mut bytes = Vec::with_capacity(image.size);
            image.file.read_to_end(&mut bytes)?;
            form.add_image(ImageSource::Bytes(bytes));
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ProductForm {
        let mut form = ProductForm {
            name: "Shirt".into(),
            category: "Apparel".into(),
            price: "19.99".into(),
            ..ProductForm::default()
        };
        form.add_image(ImageSource::Bytes(vec![1, 2, 3]));
        form
    }

    #[test]
    fn filled_form_is_valid() {
        assert!(filled_form().is_valid());
    }

    #[test]
    fn form_without_images_is_invalid() {
        let mut form = filled_form();
        form.selected_images.clear();
        assert!(!form.is_valid());
    }

    #[test]
    fn blank_required_fields_are_invalid() {
        for field in ["name", "category", "price"] {
            let mut form = filled_form();
            match field {
                "name" => form.name = "   ".into(),
                "category" => form.category = String::new(),
                _ => form.price = "\t".into(),
            }
            assert!(!form.is_valid(), "{field} should be required");
        }
    }

    #[test]
    fn colors_and_optional_fields_do_not_affect_validity() {
        let mut form = filled_form();
        form.add_color(ProductColor::new(-1));
        form.offer_percentage = "not a number".into();
        assert!(form.is_valid());

        let form = filled_form();
        assert!(form.selected_colors.is_empty());
        assert!(form.is_valid());
    }

    #[test]
    fn parses_size_lists() {
        assert_eq!(
            parse_sizes("S, M ,L"),
            Some(vec!["S".to_string(), "M".to_string(), "L".to_string()])
        );
        assert_eq!(parse_sizes(""), None);
        assert_eq!(parse_sizes("   "), None);
    }

    #[test]
    fn payload_trims_and_parses_fields() {
        let mut form = filled_form();
        form.name = "  Shirt ".into();
        form.offer_percentage = " 15 ".into();
        form.description = "  ".into();
        form.sizes = "S,M".into();
        form.add_color(ProductColor::new(0x00FF00));

        let payload = ProductFormPayload::try_from(form).unwrap();

        assert_eq!(payload.name, "Shirt");
        assert_eq!(payload.category, "Apparel");
        assert_eq!(payload.price, 19.99);
        assert_eq!(payload.offer_percentage.unwrap(), 15.0);
        assert!(payload.description.is_none());
        assert_eq!(payload.sizes, Some(vec!["S".into(), "M".into()]));
        assert_eq!(payload.colors, vec![ProductColor::new(0x00FF00)]);
        assert_eq!(payload.images.len(), 1);
    }

    #[test]
    fn empty_offer_becomes_none() {
        let payload = ProductFormPayload::try_from(filled_form()).unwrap();
        assert!(payload.offer_percentage.is_none());
        assert!(payload.sizes.is_none());
    }

    #[test]
    fn unparseable_price_is_reported() {
        let mut form = filled_form();
        form.price = "abc".into();

        let err = ProductFormPayload::try_from(form).unwrap_err();
        assert!(matches!(
            err,
            ProductFormError::InvalidNumber { field: "price", .. }
        ));
    }

    #[test]
    fn negative_numbers_are_accepted() {
        let mut form = filled_form();
        form.price = "-5".into();
        form.offer_percentage = "-10".into();
        assert!(form.is_valid());

        let payload = ProductFormPayload::try_from(form).unwrap();
        assert_eq!(payload.price, -5.0);
        assert_eq!(payload.offer_percentage.unwrap(), -10.0);

        let product = payload.into_product(vec![]);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], -5.0);
        assert_eq!(json["offerPercentage"], -10.0);
    }

    #[test]
    fn non_finite_price_is_unparseable() {
        for value in ["NaN", "inf"] {
            let mut form = filled_form();
            form.price = value.into();

            let err = ProductFormPayload::try_from(form).unwrap_err();
            assert!(matches!(
                err,
                ProductFormError::InvalidNumber { field: "price", .. }
            ));
        }
    }

    #[test]
    fn unparseable_offer_is_reported() {
        let mut form = filled_form();
        form.offer_percentage = "ten".into();

        let err = ProductFormPayload::try_from(form).unwrap_err();
        assert!(matches!(
            err,
            ProductFormError::InvalidNumber {
                field: "offer percentage",
                ..
            }
        ));
    }

    #[test]
    fn missing_images_fail_payload_validation() {
        let mut form = filled_form();
        form.selected_images.clear();

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("selected_images"));

        let err = ProductFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err, ProductFormError::Validation(_)));
    }

    #[test]
    fn products_get_distinct_ids() {
        let payload = ProductFormPayload::try_from(filled_form()).unwrap();
        let first = payload.clone().into_product(vec![]);
        let second = payload.into_product(vec![]);
        assert_ne!(first.id, second.id);
    }
}

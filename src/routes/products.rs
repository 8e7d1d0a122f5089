use actix_multipart::form::MultipartForm;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::products::UploadProductForm;
use crate::repository::DieselRepository;
use crate::routes::redirect;
use crate::services::ServiceError;
use crate::services::products::{ProductSubmitter, SubmitError};
use crate::storage::Storage;

#[post("/products")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    storage: web::Data<Storage>,
    MultipartForm(form): MultipartForm<UploadProductForm>,
) -> impl Responder {
    let form = match form.into_product_form() {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(ServiceError::from(err).to_string()).send();
            return redirect("/");
        }
    };

    if !form.is_valid() {
        FlashMessage::error("Check your inputs").send();
        return redirect("/");
    }

    let submitter = ProductSubmitter::new(storage.get_ref(), repo.get_ref());
    let result = submitter
        .submit(form, |ok| {
            if ok {
                FlashMessage::success("Product added").send();
            } else {
                FlashMessage::error("Failed to add product").send();
            }
        })
        .await;

    // Errors past validation have already been reported through the callback.
    if let Err(err @ SubmitError::Validation(_)) = result {
        FlashMessage::error(ServiceError::from(err).to_string()).send();
    }

    redirect("/")
}

use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};

use crate::forms::products::UploadProductForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::products::{
    ProductSubmitter, SubmitError, show_product as show_product_service,
    show_products as show_products_service,
};
use crate::storage::Storage;

#[derive(Deserialize, Debug)]
struct ApiV1ProductsQueryParams {
    page: Option<usize>,
}

/// JSON body returned by the API on failure.
#[derive(Serialize, Debug)]
struct ApiError {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

impl ApiError {
    fn response(status: StatusCode, kind: &'static str, message: String) -> HttpResponse {
        HttpResponse::build(status).json(ApiError {
            kind,
            message,
            index: None,
        })
    }
}

fn submit_error_response(err: &SubmitError) -> HttpResponse {
    let (status, kind, index) = match err {
        SubmitError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", None),
        SubmitError::Encode { index, .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "encode", Some(*index))
        }
        SubmitError::Upload { index, .. } => (StatusCode::BAD_GATEWAY, "upload", Some(*index)),
        SubmitError::Persist(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persist", None),
    };

    HttpResponse::build(status).json(ApiError {
        kind,
        message: err.to_string(),
        index,
    })
}

#[post("/v1/products")]
pub async fn api_v1_add_product(
    repo: web::Data<DieselRepository>,
    storage: web::Data<Storage>,
    MultipartForm(form): MultipartForm<UploadProductForm>,
) -> impl Responder {
    let form = match form.into_product_form() {
        Ok(form) => form,
        Err(err) => {
            return submit_error_response(&SubmitError::Validation(err));
        }
    };

    let submitter = ProductSubmitter::new(storage.get_ref(), repo.get_ref());
    match submitter.submit(form, |_| {}).await {
        Ok(saved) => HttpResponse::Created().json(saved),
        Err(err) => submit_error_response(&err),
    }
}

#[get("/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ApiV1ProductsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);

    match show_products_service(page, repo.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => ApiError::response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            err.to_string(),
        ),
    }
}

#[get("/v1/products/{document_id}")]
pub async fn api_v1_product(
    document_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_product_service(&document_id, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => {
            ApiError::response(StatusCode::NOT_FOUND, "not_found", "product not found".into())
        }
        Err(err) => ApiError::response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            err.to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::BlobPath;
    use crate::forms::products::ProductFormError;
    use crate::repository::errors::RepositoryError;
    use crate::storage::StorageError;

    #[test]
    fn submit_errors_map_to_statuses() {
        let validation = SubmitError::Validation(ProductFormError::InvalidNumber {
            field: "price",
            value: "abc".into(),
        });
        assert_eq!(
            submit_error_response(&validation).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let upload = SubmitError::Upload {
            index: 1,
            path: BlobPath::for_new_product_image(),
            source: StorageError::Backend("offline".into()),
        };
        assert_eq!(
            submit_error_response(&upload).status(),
            StatusCode::BAD_GATEWAY
        );

        let persist = SubmitError::Persist(RepositoryError::ConnectionError("gone".into()));
        assert_eq!(
            submit_error_response(&persist).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

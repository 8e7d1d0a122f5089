use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::products::show_products as show_products_service;

#[derive(Deserialize)]
struct IndexQueryParams {
    page: Option<usize>,
}

#[get("/")]
pub async fn index(
    params: web::Query<IndexQueryParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);

    match show_products_service(page, repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("products", &products);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

use std::process;

use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use config::{Config, ConfigError, Environment, File};
use tera::Tera;

use product_adder::db::{establish_connection_pool, run_migrations};
use product_adder::models::config::ServerConfig;
use product_adder::repository::DieselRepository;
use product_adder::routes::api::{api_v1_add_product, api_v1_product, api_v1_products};
use product_adder::routes::main::index;
use product_adder::routes::products::add_product;
use product_adder::storage::Storage;

fn load_config() -> Result<ServerConfig, ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        process::exit(1);
    }

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            process::exit(1);
        }
    };

    let storage = match Storage::from_config(&server_config.storage).await {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to configure blob storage: {e}");
            process::exit(1);
        }
    };
    let media = match &storage {
        Storage::Local(local) => {
            std::fs::create_dir_all(local.root())?;
            Some((local.mount_path().to_string(), local.root().to_path_buf()))
        }
        Storage::S3(_) => None,
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("Configured secret is unusable ({e}), flash cookies use a random key");
            Key::generate()
        }
    };
    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = web::Data::new(DieselRepository::new(pool));
    let storage = web::Data::new(storage);
    let tera = web::Data::new(tera);
    let max_upload_bytes = server_config.max_upload_bytes;

    log::info!(
        "Starting server at {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        let app = App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Logger::default())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes)
                    .memory_limit(max_upload_bytes),
            )
            .app_data(repo.clone())
            .app_data(storage.clone())
            .app_data(tera.clone())
            .service(index)
            .service(add_product)
            .service(
                web::scope("/api")
                    .service(api_v1_add_product)
                    .service(api_v1_products)
                    .service(api_v1_product),
            );

        match &media {
            Some((mount_path, root)) => app.service(Files::new(mount_path, root)),
            None => app,
        }
    })
    .bind(server_config.bind_address())?
    .run()
    .await
}

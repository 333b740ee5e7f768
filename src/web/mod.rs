// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Rocket, State};
use tracing::info;

use crate::cache::ResultCache;
use crate::config::AppConfig;
use crate::error::JobSearchError;
use crate::search::JobSearchService;

#[get("/")]
pub async fn index() -> RawHtml<&'static str> {
    handlers::index_handler().await
}

#[post("/search", data = "<form>")]
pub async fn search_jobs(
    form: Form<SearchForm>,
    service: &State<JobSearchService>,
    cache: &State<ResultCache>,
) -> Result<Json<SearchResponse>, JobSearchError> {
    handlers::search_jobs_handler(form, service, cache).await
}

#[get("/download/<result_id>/<format>")]
pub async fn download_results(
    result_id: &str,
    format: &str,
    cache: &State<ResultCache>,
) -> Result<FileDownload, JobSearchError> {
    handlers::download_results_handler(result_id, format, cache).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

// Error catchers
#[catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request".to_string()))
}

#[catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Not found".to_string()))
}

#[catch(415)]
pub fn unsupported_media_type() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Expected form data".to_string()))
}

#[catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Malformed form data".to_string()))
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error".to_string()))
}

/// Assembles the application around an already configured search service and cache.
pub fn build_rocket(
    figment: rocket::figment::Figment,
    service: JobSearchService,
    cache: ResultCache,
) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(service)
        .manage(cache)
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unsupported_media_type,
                unprocessable,
                internal_error
            ],
        )
        .mount("/", routes![index, search_jobs, download_results, health])
}

pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port));

    let service = config.search_service()?;
    let cache = config.result_cache()?;

    info!("Starting job search server on {}:{}", config.server.host, config.server.port);
    info!("Scraper backend: {:?}", config.scraper.backend);
    match config.scraper_timeout() {
        Some(timeout) => info!("Scraper timeout: {}s", timeout.as_secs()),
        None => info!("Scraper timeout: none"),
    }
    info!(
        "Result cache: capacity {}, ttl {:?}",
        config.cache.capacity, config.cache.ttl_seconds
    );

    build_rocket(figment, service, cache)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}

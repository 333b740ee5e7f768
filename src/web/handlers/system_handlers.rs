// src/web/handlers/system_handlers.rs
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use tracing::debug;

const INDEX_HTML: &str = include_str!("../../../templates/index.html");

pub async fn index_handler() -> RawHtml<&'static str> {
    RawHtml(INDEX_HTML)
}

pub async fn health_handler() -> Json<&'static str> {
    debug!("Health check");
    Json("OK")
}

// src/web/handlers/search_handlers.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::cache::ResultCache;
use crate::error::JobSearchError;
use crate::export::render_table;
use crate::search::{JobSearchService, SearchRequest};
use crate::web::types::{SearchForm, SearchResponse};

pub async fn search_jobs_handler(
    form: Form<SearchForm>,
    service: &State<JobSearchService>,
    cache: &State<ResultCache>,
) -> Result<Json<SearchResponse>, JobSearchError> {
    let request = SearchRequest::try_from(form.into_inner())?;

    let result = service.search(&request).await?;
    let table_html = render_table(&result);
    let job_count = result.job_count();
    let result_id = cache.store(result).await;

    info!(
        "Search '{}' on {} returned {} jobs (result {})",
        request.search_term, request.site, job_count, result_id
    );

    Ok(Json(SearchResponse::success(table_html, job_count, result_id)))
}

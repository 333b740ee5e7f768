// src/web/handlers/download_handlers.rs
use rocket::State;
use std::sync::Arc;
use tracing::info;

use crate::cache::ResultCache;
use crate::error::JobSearchError;
use crate::export::{export, ExportFormat};
use crate::web::types::FileDownload;

pub async fn download_results_handler(
    result_id: &str,
    format: &str,
    cache: &State<ResultCache>,
) -> Result<FileDownload, JobSearchError> {
    let result = cache.load(result_id).await?;
    let format: ExportFormat = format.parse()?;

    // spreadsheet building is CPU bound; keep it off the async workers
    let file = tokio::task::spawn_blocking({
        let result = Arc::clone(&result);
        move || export(&result, format)
    })
    .await
    .map_err(|e| JobSearchError::Export(e.to_string()))??;

    info!(
        "Serving {} ({} jobs, {} bytes)",
        file.filename,
        result.job_count(),
        file.data.len()
    );

    Ok(FileDownload(file))
}

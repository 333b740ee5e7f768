// src/error.rs
//! Error taxonomy shared by the search, cache and export paths

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;
use tracing::{error, warn};

use crate::web::types::ErrorResponse;

pub type JobSearchResult<T> = Result<T, JobSearchError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobSearchError {
    /// Missing required field or malformed input
    #[error("{0}")]
    Validation(String),

    /// The external scraper failed, returned garbage or timed out
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Unknown or expired result token
    #[error("Results not found or expired")]
    NotFound,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// CSV/XLSX serialization failure
    #[error("Download failed: {0}")]
    Export(String),
}

impl JobSearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn search_failed(message: impl ToString) -> Self {
        Self::SearchFailed(message.to_string())
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) | Self::InvalidFormat(_) => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::SearchFailed(_) | Self::Export(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for JobSearchError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            error!("{} {} failed: {}", request.method(), request.uri(), self);
        } else {
            warn!("{} {} rejected: {}", request.method(), request.uri(), self);
        }

        (status, Json(ErrorResponse::new(self.to_string()))).respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            JobSearchError::validation("missing").status(),
            Status::BadRequest
        );
        assert_eq!(
            JobSearchError::InvalidFormat("pdf".into()).status(),
            Status::BadRequest
        );
        assert_eq!(JobSearchError::NotFound.status(), Status::NotFound);
        assert_eq!(
            JobSearchError::search_failed("boom").status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn test_search_failed_message_carries_cause() {
        let err = JobSearchError::search_failed("connection refused");
        assert_eq!(err.to_string(), "Search failed: connection refused");
    }
}

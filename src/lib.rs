//! Web front end for job-board searches.
//!
//! A submitted search is normalized to each board's filter rules, handed to
//! an external scraper, cached in memory under an opaque token, rendered as
//! an HTML table and offered for download as CSV or XLSX.

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod scraper;
pub mod search;
pub mod web;

pub use cache::ResultCache;
pub use config::AppConfig;
pub use error::{JobSearchError, JobSearchResult};
pub use search::{JobSearchService, SearchRequest, SearchResult};
pub use web::{build_rocket, start_web_server};

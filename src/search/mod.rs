// src/search/mod.rs
//! Turning a submitted search into scraper parameters and running it

pub mod constraints;
pub mod location;
pub mod orchestrator;
pub mod types;

pub use constraints::normalize_filters;
pub use location::{infer_country, resolve_location, Country};
pub use orchestrator::JobSearchService;
pub use types::*;

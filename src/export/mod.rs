// src/export/mod.rs
//! HTML rendering and file export of cached search results

use chrono::{DateTime, Local};
use serde_json::Value;
use std::str::FromStr;

pub mod csv_export;
pub mod excel;
pub mod html;

pub use csv_export::to_csv;
pub use excel::to_xlsx;
pub use html::render_table;

use crate::error::{JobSearchError, JobSearchResult};
use crate::search::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = JobSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            other => Err(JobSearchError::InvalidFormat(other.to_string())),
        }
    }
}

/// A serialized result ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub format: ExportFormat,
}

pub fn export(result: &SearchResult, format: ExportFormat) -> JobSearchResult<ExportFile> {
    let data = match format {
        ExportFormat::Csv => to_csv(&result.jobs),
        ExportFormat::Excel => to_xlsx(result),
    }
    .map_err(|e| JobSearchError::Export(format!("{:#}", e)))?;

    Ok(ExportFile {
        data,
        filename: download_filename(&result.params.search_term, &Local::now(), format),
        format,
    })
}

/// `jobs_<term>_<YYYYmmdd_HHMMSS>.<ext>` with whitespace turned into underscores.
pub fn download_filename(search_term: &str, now: &DateTime<Local>, format: ExportFormat) -> String {
    let term: String = search_term
        .trim()
        .chars()
        .filter(|c| c.is_whitespace() || !(c.is_control() || matches!(c, '"' | '/' | '\\')))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    format!(
        "jobs_{}_{}.{}",
        term,
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Text form of a scraped cell, as written to CSV and spreadsheet cells.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

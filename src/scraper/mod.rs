// src/scraper/mod.rs
//! Seam to the external job-board scraper.
//!
//! The scraper is an opaque collaborator: it receives the resolved search
//! parameters as JSON and answers with a table in "split" layout
//! (`{"columns": [...], "data": [[...], ...]}`).

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub mod command_source;
pub mod http_source;

pub use command_source::CommandJobSource;
pub use http_source::HttpJobSource;

use crate::search::ResolvedSearchParameters;

#[rocket::async_trait]
pub trait JobSource: Send + Sync {
    async fn scrape_jobs(&self, params: &ResolvedSearchParameters) -> Result<JobTable>;
}

/// One scraped posting; columns beyond the well-known ones pass through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobRecord {
    fields: HashMap<String, Value>,
}

impl JobRecord {
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Value of a column, with nulls treated as missing.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column).filter(|v| !v.is_null())
    }

    fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn company(&self) -> Option<&str> {
        self.text("company")
    }

    pub fn location(&self) -> Option<&str> {
        self.text("location")
    }

    pub fn job_type(&self) -> Option<&str> {
        self.text("job_type")
    }

    pub fn date_posted(&self) -> Option<&str> {
        self.text("date_posted")
    }

    pub fn job_url(&self) -> Option<&str> {
        self.text("job_url")
    }

    pub fn site(&self) -> Option<&str> {
        self.text("site")
    }
}

/// Scraper output: the column schema in natural order plus the ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "SplitFrame")]
pub struct JobTable {
    columns: Vec<String>,
    records: Vec<JobRecord>,
}

#[derive(Deserialize)]
struct SplitFrame {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl TryFrom<SplitFrame> for JobTable {
    type Error = String;

    fn try_from(frame: SplitFrame) -> Result<Self, Self::Error> {
        let records = frame
            .data
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != frame.columns.len() {
                    return Err(format!(
                        "row {} has {} values but the table has {} columns",
                        index,
                        row.len(),
                        frame.columns.len()
                    ));
                }
                Ok(JobRecord::new(
                    frame.columns.iter().cloned().zip(row).collect(),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns: frame.columns,
            records,
        })
    }
}

impl JobTable {
    pub fn new(columns: Vec<String>, records: Vec<JobRecord>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell values of a record in schema order.
    pub fn row<'a>(&'a self, record: &'a JobRecord) -> impl Iterator<Item = Option<&'a Value>> {
        self.columns.iter().map(move |column| record.get(column))
    }
}

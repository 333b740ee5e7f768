// src/export/csv_export.rs
use anyhow::{Context, Result};

use super::cell_text;
use crate::scraper::JobTable;

/// Full record set, header first, columns in the scraper's order.
pub fn to_csv(jobs: &JobTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(jobs.columns())
        .context("Failed to write CSV header")?;

    for record in jobs.records() {
        let row: Vec<String> = jobs.row(record).map(cell_text).collect();
        writer
            .write_record(&row)
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

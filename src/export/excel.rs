// src/export/excel.rs
use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

use super::cell_text;
use crate::search::SearchResult;

pub const JOBS_SHEET: &str = "Jobs";
pub const PARAMETERS_SHEET: &str = "Search_Parameters";

/// Two-sheet workbook: every scraped record, then the parameters of the search.
pub fn to_xlsx(result: &SearchResult) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(JOBS_SHEET).context("Failed to name jobs sheet")?;

        let columns = result.jobs.columns();
        write_header(sheet, columns.iter().map(String::as_str))?;

        for (index, record) in result.jobs.records().iter().enumerate() {
            let row = sheet_row(index + 1)?;
            for (col, value) in result.jobs.row(record).enumerate() {
                write_cell(sheet, row, sheet_col(col)?, value)?;
            }
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(PARAMETERS_SHEET)
            .context("Failed to name parameters sheet")?;

        let summary = result.parameter_summary();
        write_header(sheet, summary.iter().map(|(name, _)| *name))?;
        for (col, (_, value)) in summary.iter().enumerate() {
            write_cell(sheet, 1, sheet_col(col)?, Some(value))?;
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to build spreadsheet")
}

fn write_header<'a>(sheet: &mut Worksheet, names: impl Iterator<Item = &'a str>) -> Result<()> {
    for (col, name) in names.enumerate() {
        sheet
            .write_string(0, sheet_col(col)?, name)
            .context("Failed to write header cell")?;
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&Value>) -> Result<()> {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Bool(flag)) => {
            sheet
                .write_boolean(row, col, *flag)
                .context("Failed to write cell")?;
        }
        Some(Value::Number(n)) => {
            let number = n.as_f64().context("Number out of range")?;
            sheet
                .write_number(row, col, number)
                .context("Failed to write cell")?;
        }
        other => {
            sheet
                .write_string(row, col, cell_text(other).as_str())
                .context("Failed to write cell")?;
        }
    }
    Ok(())
}

fn sheet_row(index: usize) -> Result<u32> {
    u32::try_from(index).context("Too many rows for a spreadsheet")
}

fn sheet_col(index: usize) -> Result<u16> {
    u16::try_from(index).context("Too many columns for a spreadsheet")
}

use crate::error::{Error, Result};
use crate::extract::DataTable;
use chrono::NaiveDate;
use tracing::debug;

pub const DATE_COLUMN: &str = "Date";
pub const VALUE_COLUMN: &str = "Value";

/// One typed observation. `value` is in billions of dollars, as the
/// source publishes it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Date formats seen on the source page, tried in order. ISO is included
/// so already-clean data passes through unchanged.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Strip the currency dressing from a published figure: `$`, thousands
/// commas, and the trailing billions suffix `B`. Any other unit suffix
/// (`M`, `K`) is left in place and fails the numeric parse rather than
/// being misread as billions.
pub fn clean_value(text: &str) -> Option<f64> {
    let stripped: String = text
        .trim()
        .trim_end_matches('B')
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    stripped.trim().parse().ok()
}

/// Coerce the normalized table into typed records, preserving source
/// order. The first cell that refuses to parse aborts the run, naming
/// its row.
pub fn clean_table(table: &DataTable) -> Result<Vec<CleanedRecord>> {
    let date_idx = table.column(DATE_COLUMN).ok_or_else(|| {
        Error::Extraction(format!(
            "no '{DATE_COLUMN}' column; headers are {:?}",
            table.headers
        ))
    })?;
    let value_idx = table.column(VALUE_COLUMN).ok_or_else(|| {
        Error::Extraction(format!(
            "no '{VALUE_COLUMN}' column; headers are {:?}",
            table.headers
        ))
    })?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let date = parse_date(&row[date_idx]).ok_or_else(|| Error::Cleaning {
            row: i + 1,
            message: format!("unparseable date {:?}", row[date_idx]),
        })?;
        let value = clean_value(&row[value_idx]).ok_or_else(|| Error::Cleaning {
            row: i + 1,
            message: format!("unparseable value {:?}", row[value_idx]),
        })?;
        records.push(CleanedRecord { date, value });
    }
    debug!(records = records.len(), "coerced table");
    Ok(records)
}

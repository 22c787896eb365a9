use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cells::normalize_row;
use super::decode::{parse_opdrts, parse_percent, parse_pollster};
use super::table::RawRow;
use crate::error::{DecodeError, RowError};

/// Dates, pollster, client, sample size, rejoin, stay out, neither.
/// Anything after these (the lead column) is ignored.
pub const REQUIRED_CELLS: usize = 7;

/// One poll, decoded from one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pollster_link: String,
    pub pollster_name: String,
    pub client: String,
    pub sample_size: u32,
    pub rejoin: f64,
    pub stay_out: f64,
    pub neither: f64,
}

/// Decode a raw row into a [`Record`], attaching the row to any failure.
pub fn assemble_row(row: &RawRow) -> Result<Record, RowError> {
    decode_cells(&row.cells).map_err(|source| RowError {
        source_name: None,
        line: row.line,
        cells: row.cells.clone(),
        source,
    })
}

fn decode_cells(raw: &[String]) -> Result<Record, DecodeError> {
    if raw.len() < REQUIRED_CELLS {
        return Err(DecodeError::RowShape {
            found: raw.len(),
            expected: REQUIRED_CELLS,
        });
    }
    let cells = normalize_row(raw);

    let dates = parse_opdrts(&cells[0])?;
    let pollster = parse_pollster(&cells[1])?;
    let client = cells[2].clone();
    let sample_size = parse_sample_size(&cells[3])?;
    let rejoin = parse_percent(&cells[4])?;
    let stay_out = parse_percent(&cells[5])?;
    let neither = parse_percent(&cells[6])?;

    if sample_size == 0 {
        warn!(pollster = %pollster.label, end = %dates.end, "poll reports a sample size of 0");
    }
    let total = rejoin + stay_out + neither;
    if (total - 1.0).abs() > 0.05 {
        warn!(
            pollster = %pollster.label,
            end = %dates.end,
            total_pct = total * 100.0,
            "shares do not add up to 100%"
        );
    }
    debug!(
        pollster = %pollster.label,
        start = %dates.start,
        end = %dates.end,
        days = dates.days(),
        "decoded row"
    );

    Ok(Record {
        start_date: dates.start,
        end_date: dates.end,
        pollster_link: pollster.url,
        pollster_name: pollster.label,
        client,
        sample_size,
        rejoin,
        stay_out,
        neither,
    })
}

/// Parse `2,016` into `2016`. Thousands separators and spaces are dropped.
pub fn parse_sample_size(cell: &str) -> Result<u32, DecodeError> {
    let digits: String = cell
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    digits
        .parse::<u32>()
        .map_err(|_| DecodeError::numeric("sample size", cell))
}

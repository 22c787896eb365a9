use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::DecodeError;

// Template names fold the first letter, so `{{Opdrts|...}}` is the same template.
static OPDRTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{\s*[Oo]pdrts\s*\|(.*)\}\}$").unwrap());

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const EXAMPLE: &str = "{{opdrts|29|3|Jan|2024|year}}";

/// Inclusive fieldwork period of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Decode an `{{opdrts|startDay|endDay|month|year|...}}` template.
///
/// An empty start day means a single-day poll. When the start day is after the
/// end day the poll began in the previous month (and year, for January).
pub fn parse_opdrts(cell: &str) -> Result<DateRange, DecodeError> {
    let cell = cell.trim();
    let inner = OPDRTS_RE
        .captures(cell)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            DecodeError::format(format!(
                "date cell {} must be in format {}; {{{{opdrts| and }}}} not found",
                cell, EXAMPLE
            ))
        })?;

    let parts: Vec<&str> = inner.split('|').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(DecodeError::format(format!(
            "date cell {} must be in format {}; at least three | separated parts are required",
            cell, EXAMPLE
        )));
    }

    let end_day = parse_day(parts[1])?;
    let start_day = if parts[0].is_empty() {
        end_day
    } else {
        parse_day(parts[0])?
    };
    let end_month = parse_month(parts[2])?;
    let end_year = match parts.get(3) {
        Some(year) => parse_year(year)?,
        None => {
            return Err(DecodeError::format(format!(
                "date cell {} has no year, expected format {}",
                cell, EXAMPLE
            )))
        }
    };

    let (start_month, start_year) = if end_day >= start_day {
        (end_month, end_year)
    } else if end_month == 1 {
        (12, end_year - 1)
    } else {
        (end_month - 1, end_year)
    };

    let start = make_date(start_year, start_month, start_day)?;
    let end = make_date(end_year, end_month, end_day)?;
    Ok(DateRange { start, end })
}

fn parse_day(s: &str) -> Result<u32, DecodeError> {
    s.parse::<u32>().map_err(|_| DecodeError::numeric("day", s))
}

/// Month as 1-12, from either a number or a three letter abbreviation.
pub fn parse_month(s: &str) -> Result<u32, DecodeError> {
    if let Ok(n) = s.parse::<u32>() {
        return if (1..=12).contains(&n) {
            Ok(n)
        } else {
            Err(DecodeError::InvalidMonth(s.to_string()))
        };
    }
    let lower = s.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| DecodeError::InvalidMonth(s.to_string()))
}

fn parse_year(s: &str) -> Result<i32, DecodeError> {
    let year = s.parse::<i32>().map_err(|_| DecodeError::numeric("year", s))?;
    if year > 1900 && year < 9999 {
        Ok(year)
    } else {
        Err(DecodeError::Date(format!(
            "year {} is outside 1901-9998",
            year
        )))
    }
}

fn make_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DecodeError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DecodeError::Date(format!("{:04}-{:02}-{:02} does not exist", year, month, day))
    })
}

impl DateRange {
    /// Length of the fieldwork period in days, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

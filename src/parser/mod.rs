pub mod cells;
pub mod decode;
pub mod record;
pub mod table;

use record::{assemble_row, Record};
use table::Rows;

use crate::error::RowError;

/// Tokenize → normalize → decode, stopping at the first bad row.
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Record>, RowError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Rows::new(lines.into_iter())
        .map(|row| assemble_row(&row))
        .collect()
}

/// Parse a whole wikitable held in memory.
pub fn parse_table(text: &str) -> Result<Vec<Record>, RowError> {
    parse_lines(text.lines())
}

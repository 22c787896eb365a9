/// Line that separates two wikitable rows.
pub const ROW_SEPARATOR: &str = "|-";

/// One table row as it appeared in the source, cells in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number of the row's first cell.
    pub line: usize,
    pub cells: Vec<String>,
}

/// Splits a stream of wikitext lines into rows.
///
/// Each non-separator line is one cell, with its leading `|` removed. Table
/// chrome (`{|`, `|}`, captions, `!` header cells) and blank lines never become
/// cells, so a header block before the first `|-` yields no row.
pub struct Rows<I> {
    lines: I,
    line_no: usize,
    done: bool,
}

impl<I, S> Rows<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Rows {
            lines,
            line_no: 0,
            done: false,
        }
    }
}

impl<I, S> Iterator for Rows<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        if self.done {
            return None;
        }

        let mut row = RawRow {
            line: 0,
            cells: Vec::new(),
        };

        for raw in self.lines.by_ref() {
            self.line_no += 1;
            let line = raw.as_ref().trim();

            if line == ROW_SEPARATOR {
                if row.cells.is_empty() {
                    continue;
                }
                return Some(row);
            }
            if is_table_chrome(line) {
                continue;
            }

            if row.cells.is_empty() {
                row.line = self.line_no;
            }
            let cell = line.strip_prefix('|').unwrap_or(line).trim();
            row.cells.push(cell.to_string());
        }

        self.done = true;
        if row.cells.is_empty() {
            None
        } else {
            Some(row)
        }
    }
}

fn is_table_chrome(line: &str) -> bool {
    line.is_empty()
        || line.starts_with("{|")
        || line == "|}"
        || line.starts_with("|+")
        || line.starts_with('!')
}

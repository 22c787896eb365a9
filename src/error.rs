use thiserror::Error;

/// Why a single cell (or row) could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Required delimiters missing: template braces, trailing `%`, bracket pair.
    #[error("{0}")]
    Format(String),

    #[error("'{0}' is not a valid month, expected 1-12 or Jan, Feb, ...")]
    InvalidMonth(String),

    #[error("invalid date: {0}")]
    Date(String),

    #[error("'{value}' is not a valid {what}")]
    Numeric { what: &'static str, value: String },

    #[error("link {0} is an internal [[link]], only external [url label] links are supported")]
    UnsupportedLink(String),

    #[error("row has {found} cells, at least {expected} are required")]
    RowShape { found: usize, expected: usize },
}

impl DecodeError {
    pub fn format(msg: impl Into<String>) -> Self {
        DecodeError::Format(msg.into())
    }

    pub fn numeric(what: &'static str, value: &str) -> Self {
        DecodeError::Numeric {
            what,
            value: value.to_string(),
        }
    }
}

/// A decode failure together with the raw row it came from.
#[derive(Debug, Clone, Error)]
#[error("failed to parse row at {}: {source}\n  raw row: {cells:?}", location(.source_name, .line))]
pub struct RowError {
    pub source_name: Option<String>,
    pub line: usize,
    pub cells: Vec<String>,
    #[source]
    pub source: DecodeError,
}

impl RowError {
    /// Attach the file name the row was read from.
    pub fn in_source(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

fn location(source_name: &Option<String>, line: &usize) -> String {
    match source_name {
        Some(name) => format!("{}:{}", name, line),
        None => format!("line {}", line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_reports_row_verbatim() {
        let err = RowError {
            source_name: None,
            line: 12,
            cells: vec!["{{opdrts|2|3|Foo|2024}}".into(), "YouGov".into()],
            source: DecodeError::InvalidMonth("Foo".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("'Foo' is not a valid month"));
        assert!(msg.contains(r#""{{opdrts|2|3|Foo|2024}}""#));
    }

    #[test]
    fn source_name_prefixes_location() {
        let err = RowError {
            source_name: None,
            line: 3,
            cells: vec![],
            source: DecodeError::RowShape { found: 0, expected: 7 },
        }
        .in_source("2021.txt");
        assert!(err.to_string().starts_with("failed to parse row at 2021.txt:3"));
        assert!(matches!(err.source, DecodeError::RowShape { found: 0, .. }));
    }
}

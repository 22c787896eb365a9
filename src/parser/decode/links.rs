use crate::error::DecodeError;

/// An external link as `(url, label)`. `url` is empty for plain text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkRef {
    pub url: String,
    pub label: String,
}

/// Decode a wiki external link: `[https://url/ Label text]`.
pub fn parse_ext_link(cell: &str) -> Result<LinkRef, DecodeError> {
    let cell = cell.trim();
    if !cell.starts_with('[') || !cell.ends_with(']') || cell.len() < 2 {
        return Err(DecodeError::format(format!(
            "link {} cannot be parsed, cannot find start or end [ and ]",
            cell
        )));
    }
    if cell.starts_with("[[") || cell.ends_with("]]") {
        return Err(DecodeError::UnsupportedLink(cell.to_string()));
    }

    let inner = &cell[1..cell.len() - 1];
    let (url, label) = inner
        .split_once(char::is_whitespace)
        .map(|(u, l)| (u, l.trim_start()))
        .unwrap_or((inner, ""));

    if url.is_empty() {
        return Err(DecodeError::format(format!("link {} has no url", cell)));
    }
    if label.is_empty() {
        return Err(DecodeError::format(format!("link {} has no label", cell)));
    }

    Ok(LinkRef {
        url: url.to_string(),
        label: label.to_string(),
    })
}

/// Decode a pollster cell: an external link, or a bare name.
pub fn parse_pollster(cell: &str) -> Result<LinkRef, DecodeError> {
    let cell = cell.trim();
    if cell.starts_with('[') && cell.ends_with(']') {
        parse_ext_link(cell)
    } else {
        Ok(LinkRef {
            url: String::new(),
            label: cell.to_string(),
        })
    }
}

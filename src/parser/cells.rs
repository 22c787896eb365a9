const BOLD: &str = "'''";
const ITALIC: &str = "''";
const STYLE_PREFIX: &str = "style=";

/// Strip incidental wiki markup from one raw cell.
///
/// Removes bold and italic quote markers, a `style="..."|` attribute prefix and
/// a leading `|` cell separator. Content is otherwise left alone, and applying
/// this twice gives the same result as applying it once.
pub fn normalize_cell(raw: &str) -> String {
    // Bold first: removing `''` first would eat two thirds of every `'''`.
    let text = raw.trim().replace(BOLD, "").replace(ITALIC, "");
    let mut text = text.trim();

    loop {
        if text.starts_with(STYLE_PREFIX) {
            if let Some((_, rest)) = text.split_once('|') {
                text = rest.trim();
                continue;
            }
        }
        match text.strip_prefix('|') {
            Some(rest) => text = rest.trim(),
            None => break,
        }
    }

    text.to_string()
}

/// Normalize every cell of a row.
pub fn normalize_row(cells: &[String]) -> Vec<String> {
    cells.iter().map(|c| normalize_cell(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_percentage_with_style() {
        assert_eq!(
            normalize_cell(r#"style="background:#DDE0EE"|'''51%'''"#),
            "51%"
        );
    }

    #[test]
    fn italic_client() {
        assert_eq!(normalize_cell("''N/A''"), "N/A");
    }

    #[test]
    fn leading_separator_from_double_pipe_line() {
        assert_eq!(
            normalize_cell("|[https://yougov.co.uk YouGov]"),
            "[https://yougov.co.uk YouGov]"
        );
    }

    #[test]
    fn style_with_spaces_around_pipe() {
        assert_eq!(
            normalize_cell(r#"style="background:#4477AA;color:#FFFFFF;" | 15%"#),
            "15%"
        );
    }

    #[test]
    fn style_without_pipe_is_left_alone() {
        assert_eq!(normalize_cell("style=broken"), "style=broken");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(normalize_cell("  Deltapoll "), "Deltapoll");
        assert_eq!(normalize_cell("Ipsos | MORI"), "Ipsos | MORI");
    }

    #[test]
    fn bold_italic_run() {
        assert_eq!(normalize_cell("'''''Survation'''''"), "Survation");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "   ",
            "|",
            "||x",
            "|  |y",
            "'''' a",
            "''''",
            "' '' '''",
            "'''  |  style=a|b",
            r#"style="x"| style="y" |'''42%'''"#,
            "style=",
            "style=|",
            "|style=a| ''N/A''",
            "[[Internal]]",
            "{{opdrts|29|3|Jan|2024|year}}",
        ];
        for s in samples {
            let once = normalize_cell(s);
            assert_eq!(normalize_cell(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn whole_row() {
        let row = vec!["''N/A''".to_string(), "'''13%'''".to_string()];
        assert_eq!(normalize_row(&row), vec!["N/A", "13%"]);
    }
}

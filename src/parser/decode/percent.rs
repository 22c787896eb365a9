use crate::error::DecodeError;

/// Parse `51%` into `0.51`.
pub fn parse_percent(cell: &str) -> Result<f64, DecodeError> {
    let cell = cell.trim();
    let number = cell.strip_suffix('%').ok_or_else(|| {
        DecodeError::format(format!("percentage {} cannot be parsed, must end with %", cell))
    })?;
    let number = number.trim();

    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v / 100.0),
        _ => Err(DecodeError::numeric("percentage", number)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::cells::normalize_cell;

    #[test]
    fn bold_after_normalization() {
        assert_eq!(parse_percent(&normalize_cell("'''51%'''")).unwrap(), 0.51);
    }

    #[test]
    fn decimals_and_spaces() {
        assert_eq!(parse_percent("12.5%").unwrap(), 0.125);
        assert_eq!(parse_percent(" 7 %").unwrap(), 0.07);
        assert_eq!(parse_percent("0%").unwrap(), 0.0);
    }

    #[test]
    fn missing_percent_sign() {
        assert!(matches!(parse_percent("36"), Err(DecodeError::Format(_))));
        assert!(matches!(parse_percent(""), Err(DecodeError::Format(_))));
    }

    #[test]
    fn not_a_number() {
        for s in ["abc%", "%", "1,5%", "NaN%", "inf%", "5%%"] {
            assert!(
                matches!(parse_percent(s), Err(DecodeError::Numeric { what: "percentage", .. })),
                "{:?}",
                s
            );
        }
    }
}

/// Parses the thermocouple file: the first whitespace-separated token is the
/// temperature, anything after it is ignored.
pub fn parse_reading(raw: &str) -> Option<f32> {
    let token = raw.split_whitespace().next()?;
    token.parse::<f32>().ok().filter(|value| value.is_finite())
}

pub fn format_reading(temperature: f32) -> String {
    format!("{temperature:.2}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_token() {
        assert_eq!(parse_reading("68.25\n"), Some(68.25));
        assert_eq!(parse_reading("  -4.5 C garbage"), Some(-4.5));
    }

    #[test]
    fn rejects_empty_or_non_numeric() {
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("   \n"), None);
        assert_eq!(parse_reading("warm"), None);
        assert_eq!(parse_reading("NaN"), None);
    }

    #[test]
    fn formatted_reading_parses_back() {
        assert_eq!(parse_reading(&format_reading(70.5)), Some(70.5));
    }
}

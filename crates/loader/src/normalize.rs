//! Cleanup of the raw values found in the source spreadsheets.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Decodes file contents as UTF-8, falling back to Latin-1, and strips a BOM
pub fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        // Every Latin-1 byte is the code point of the same value
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Picks `;` when the header line uses it, `,` otherwise
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') { b';' } else { b',' }
}

/// Parses `S`/`N` style flags; `None` for anything unrecognised
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_uppercase().as_str() {
        "S" | "SIM" | "TRUE" | "1" => Some(true),
        "N" | "NAO" | "NÃO" | "FALSE" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Parses `dd/mm/yyyy` or `yyyy-mm-dd`, with or without a time part
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Parses a coordinate written with either a decimal point or a decimal comma
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// Treats empty cells and the `-` placeholder as missing
pub fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty() && trimmed != "-").then_some(trimmed)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_latin1_and_bom() {
        assert_eq!(decode(b"\xef\xbb\xbfCOD".to_vec()), "COD");
        assert_eq!(decode(vec![b'S', 0xe3, b'o']), "São");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("A;B\n1;2"), b';');
        assert_eq!(detect_delimiter("A,B\n1;2"), b',');
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("S"), Some(true));
        assert_eq!(parse_flag(" n "), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("talvez"), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7);
        assert_eq!(parse_date("07/03/2025"), expected);
        assert_eq!(parse_date("2025-03-07"), expected);
        assert_eq!(parse_date("2025-03-07 14:30:00"), expected);
        assert_eq!(parse_date("March 7"), None);
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("-23,55"), Some(-23.55));
        assert_eq!(parse_coordinate("-46.63"), Some(-46.63));
        assert_eq!(parse_coordinate(""), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(" 12 "), Some("12"));
        assert_eq!(non_empty("-"), None);
        assert_eq!(non_empty(""), None);
    }
}

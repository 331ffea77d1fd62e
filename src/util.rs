// Utility helpers for parsing and formatting.
//
// This module centralizes the "dirty" CSV value handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a polarity cell into a sentiment value in `1..=5`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Requires an integer; `"4.5"` or `"good"` are rejected.
/// - Returns `None` for anything outside the 1..=5 range.
pub fn parse_polarity(s: Option<&str>) -> Option<u8> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    match s.parse::<i64>() {
        Ok(v) if (1..=5).contains(&v) => Some(v as u8),
        _ => None,
    }
}

/// Round to one decimal place, the precision used for all percentages.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Render a percentage with exactly one decimal (`"100.0"`, `"33.3"`).
pub fn format_pct(v: f64) -> String {
    format!("{:.1}", v)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts shown to the user
    // (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_accepts_range() {
        for p in 1..=5u8 {
            assert_eq!(parse_polarity(Some(&p.to_string())), Some(p));
        }
        assert_eq!(parse_polarity(Some(" 3 ")), Some(3));
    }

    #[test]
    fn polarity_rejects_out_of_range_and_junk() {
        assert_eq!(parse_polarity(Some("0")), None);
        assert_eq!(parse_polarity(Some("6")), None);
        assert_eq!(parse_polarity(Some("-1")), None);
        assert_eq!(parse_polarity(Some("4.5")), None);
        assert_eq!(parse_polarity(Some("good")), None);
        assert_eq!(parse_polarity(Some("")), None);
        assert_eq!(parse_polarity(None), None);
    }

    #[test]
    fn rounding_and_percent_format() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(format_pct(100.0), "100.0");
        assert_eq!(format_pct(0.0), "0.0");
    }

    #[test]
    fn int_formatting_uses_separators() {
        assert_eq!(format_int(9855u64), "9,855");
        assert_eq!(format_int(12u64), "12");
    }
}

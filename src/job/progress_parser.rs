//! # Progress Parser
//!
//! Estrae la percentuale di avanzamento dalle righe di output di ocrmypdf.
//! Il parsing è locale alla riga: nessuno stato tra una riga e l'altra.

use regex::Regex;
use std::sync::OnceLock;

/// Parser for `page <current> of <total>` markers
pub struct ProgressParser;

impl ProgressParser {
    fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"page (\d+) of (\d+)").expect("valid progress regex"))
    }

    /// Parse a single output line into a percentage in `0..=100`.
    ///
    /// The match is case-sensitive on the word `page`. `current > total`,
    /// including a `current` too large for `u64`, is clamped to 100. A zero
    /// or overflowing total yields `None`.
    pub fn parse(line: &str) -> Option<u8> {
        let caps = Self::pattern().captures(line)?;
        // Only digits reach here, so the sole parse failure is overflow
        let current: u64 = caps[1].parse().unwrap_or(u64::MAX);
        let total: u64 = caps[2].parse().ok()?;
        if total == 0 {
            return None;
        }

        let percent = (u128::from(current) * 100 / u128::from(total)).min(100);
        Some(percent as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_percentage() {
        // Lowercase on purpose: "Page 3 of 12" does not match, see test_case_sensitive
        assert_eq!(ProgressParser::parse("Postprocessing... page 3 of 12"), Some(25));
        assert_eq!(ProgressParser::parse("page 12 of 12"), Some(100));
        assert_eq!(ProgressParser::parse("page 1 of 3"), Some(33));
        assert_eq!(ProgressParser::parse("page 2 of 3"), Some(66));
        assert_eq!(ProgressParser::parse("page 0 of 7"), Some(0));
    }

    #[test]
    fn test_exact_integer_floor() {
        // 29/100*100 in floating point lands just below 29
        assert_eq!(ProgressParser::parse("page 29 of 100"), Some(29));
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(ProgressParser::parse("Optimize ratio: 1.52 savings: 34.2%"), None);
        assert_eq!(ProgressParser::parse(""), None);
        assert_eq!(ProgressParser::parse("page x of 3"), None);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(ProgressParser::parse("Page 3 of 12"), None);
    }

    #[test]
    fn test_malformed_counts() {
        assert_eq!(ProgressParser::parse("page 15 of 12"), Some(100));
        assert_eq!(ProgressParser::parse("page 3 of 0"), None);
        assert_eq!(
            ProgressParser::parse("page 99999999999999999999999 of 2"),
            Some(100)
        );
        assert_eq!(
            ProgressParser::parse("page 2 of 99999999999999999999999"),
            None
        );
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(ProgressParser::parse("page 1 of 4 (was page 4 of 4)"), Some(25));
    }
}

//! Lexical rules shared by the step interpreter and the workout compiler.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// First run of word characters / `@`, optionally followed by a `(...)` parameter
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([\w@]+)(?:\(([^()]*)\))?").expect("tag pattern is a valid regex")
});

/// Split a token like `@P(4:30-4:50)` or `repeat(4)` into a lowercase tag and its raw parameter
///
/// Only the leftmost match is considered. The parameter is `None` when no
/// parenthesis group follows the tag, and `Some("")` for `tag()`.
pub fn split_tag(token: &str) -> (Option<String>, Option<String>) {
    match TAG_PATTERN.captures(token) {
        Some(caps) => {
            let tag = caps.get(1).map(|m| m.as_str().to_lowercase());
            let parameter = caps.get(2).map(|m| m.as_str().to_string());
            (tag, parameter)
        }
        None => (None, None),
    }
}

fn split_clock(time: &str) -> Result<(u32, u32)> {
    let mut fields = time.trim().split(':');
    let (Some(minutes), Some(seconds), None) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::Format(format!("expected mm:ss, got '{}'", time)));
    };

    let parse = |field: &str| {
        field
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::Format(format!("invalid number '{}' in '{}': {}", field, time, e)))
    };

    Ok((parse(minutes)?, parse(seconds)?))
}

/// `"4:30"` -> 4.5
pub fn to_minutes(time: &str) -> Result<f64> {
    let (minutes, seconds) = split_clock(time)?;
    Ok(minutes as f64 + seconds as f64 / 60.0)
}

/// `"1:40"` -> 100
pub fn to_seconds(time: &str) -> Result<u32> {
    let (minutes, seconds) = split_clock(time)?;
    Ok(minutes * 60 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tag_with_parameter() {
        assert_eq!(
            split_tag("@P(4:30-4:50)"),
            (Some("@p".to_string()), Some("4:30-4:50".to_string()))
        );
        assert_eq!(
            split_tag("repeat(4)"),
            (Some("repeat".to_string()), Some("4".to_string()))
        );
    }

    #[test]
    fn test_split_tag_without_parameter() {
        assert_eq!(split_tag("Warmup"), (Some("warmup".to_string()), None));
        assert_eq!(split_tag("@H"), (Some("@h".to_string()), None));
    }

    #[test]
    fn test_split_tag_empty_parameter() {
        assert_eq!(
            split_tag("repeat()"),
            (Some("repeat".to_string()), Some(String::new()))
        );
    }

    #[test]
    fn test_split_tag_takes_leftmost_match() {
        assert_eq!(
            split_tag("@C(80-90)@H(z2)"),
            (Some("@c".to_string()), Some("80-90".to_string()))
        );
        assert_eq!(
            split_tag("  @STYLE(Back)"),
            (Some("@style".to_string()), Some("Back".to_string()))
        );
    }

    #[test]
    fn test_split_tag_no_match() {
        assert_eq!(split_tag("()-:"), (None, None));
        assert_eq!(split_tag(""), (None, None));
    }

    #[test]
    fn test_to_minutes() {
        assert!((to_minutes("4:30").unwrap() - 4.5).abs() < 1e-9);
        assert!((to_minutes("0:15").unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_to_seconds() {
        assert_eq!(to_seconds("1:40").unwrap(), 100);
        assert_eq!(to_seconds("0:59").unwrap(), 59);
    }

    #[test]
    fn test_clock_format_errors() {
        assert!(matches!(to_minutes("4"), Err(Error::Format(_))));
        assert!(matches!(to_seconds("1:2:3"), Err(Error::Format(_))));
        assert!(matches!(to_seconds("a:10"), Err(Error::Format(_))));
        assert!(matches!(to_minutes("4:30-4:50"), Err(Error::Format(_))));
    }
}

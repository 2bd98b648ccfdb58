//! Dotted chapter numbers.
//!
//! A chapter number such as `3.2.1` encodes both the chapter's parent (`3.2`)
//! and its ordinal among its siblings (`1`). Top-level chapters have a single
//! segment and hang directly off the catalog root.

/// The separator between the segments of a chapter number.
pub const SEPARATOR: char = '.';

/// Error returned when the last segment of a chapter number is not a
/// non-negative integer.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Invalid chapter number '{number}': expected a non-negative integer, got '{segment}'")]
pub struct FormatError {
    number: String,
    segment: String,
}

impl FormatError {
    /// The chapter number that could not be parsed.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The offending segment of the chapter number.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }
}

/// Returns the ordinal position encoded in the last segment of a chapter
/// number.
///
/// `"3.2.1"` yields `1`, and a number without a separator is parsed whole, so
/// `"7"` yields `7`.
///
/// # Errors
///
/// Returns a [`FormatError`] if the last segment is empty or contains
/// anything other than ASCII digits.
///
/// # Examples
///
/// ```
/// use tailoring::domain::number::position_of;
///
/// assert_eq!(position_of("3.2.1").unwrap(), 1);
/// assert_eq!(position_of("12").unwrap(), 12);
/// assert!(position_of("3.x").is_err());
/// ```
pub fn position_of(number: &str) -> Result<u32, FormatError> {
    let segment = last_segment(number);

    let error = || FormatError {
        number: number.to_string(),
        segment: segment.to_string(),
    };

    // `u32::from_str` accepts a leading '+', which is not a valid segment
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error());
    }

    segment.parse().map_err(|_| error())
}

/// Returns the number of the parent chapter, or `None` for a top-level
/// chapter.
///
/// # Examples
///
/// ```
/// use tailoring::domain::number::parent_number_of;
///
/// assert_eq!(parent_number_of("3.2.1"), Some("3.2"));
/// assert_eq!(parent_number_of("3"), None);
/// ```
#[must_use]
pub fn parent_number_of(number: &str) -> Option<&str> {
    number.rfind(SEPARATOR).map(|index| &number[..index])
}

/// The nesting depth of a chapter number; top-level chapters have depth 1.
#[must_use]
pub fn depth_of(number: &str) -> usize {
    number.matches(SEPARATOR).count() + 1
}

fn last_segment(number: &str) -> &str {
    number
        .rfind(SEPARATOR)
        .map_or(number, |index| &number[index + SEPARATOR.len_utf8()..])
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("1", 1; "top level")]
    #[test_case("3.2.1", 1; "nested")]
    #[test_case("3.2.10", 10; "multi digit")]
    #[test_case("4.07", 7; "leading zero")]
    #[test_case("0", 0; "zero")]
    fn position_of_valid(number: &str, expected: u32) {
        assert_eq!(position_of(number).unwrap(), expected);
    }

    #[test_case("x", "x"; "non numeric")]
    #[test_case("5.x", "x"; "non numeric suffix")]
    #[test_case("5.", ""; "trailing separator")]
    #[test_case("", ""; "empty")]
    #[test_case("5.-1", "-1"; "negative")]
    #[test_case("5.+1", "+1"; "explicit sign")]
    #[test_case("5.1a", "1a"; "mixed")]
    #[test_case("5.99999999999", "99999999999"; "overflow")]
    fn position_of_invalid(number: &str, segment: &str) {
        let error = position_of(number).unwrap_err();
        assert_eq!(error.number(), number);
        assert_eq!(error.segment(), segment);
    }

    #[test]
    fn format_error_names_the_offending_number() {
        let error = position_of("2.4.x").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid chapter number '2.4.x': expected a non-negative integer, got 'x'"
        );
    }

    #[test_case("3.2.1", Some("3.2"); "nested")]
    #[test_case("3.2", Some("3"); "second level")]
    #[test_case("3", None; "top level")]
    #[test_case("", None; "empty")]
    fn parent_number(number: &str, expected: Option<&str>) {
        assert_eq!(parent_number_of(number), expected);
    }

    #[test_case("1", 1; "top level")]
    #[test_case("1.2", 2; "second level")]
    #[test_case("1.2.3.4", 4; "fourth level")]
    fn depth(number: &str, expected: usize) {
        assert_eq!(depth_of(number), expected);
    }
}

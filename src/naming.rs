//! Output file naming.
//!
//! A file name is assembled from three user-edited parts: leading text, a
//! counter (optionally zero-padded), and trailing text. Empty parts drop out
//! together with their separator, so `("IMG", "", "3", "final")` renders as
//! `"IMG final"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted zero-pad width.
pub const MAX_PAD_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("file number '{0}' is not a number")]
    InvalidCounter(String),

    #[error("pad width '{0}' is not a number")]
    InvalidPadWidth(String),

    #[error("pad width {0} exceeds the maximum of {MAX_PAD_WIDTH}")]
    PadWidthTooLarge(usize),
}

/// The raw naming fields as the operator typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNameSpec {
    pub leading: String,
    pub counter: String,
    pub pad_width: String,
    pub trailing: String,
}

impl FileNameSpec {
    pub fn new(
        leading: impl Into<String>,
        counter: impl Into<String>,
        pad_width: impl Into<String>,
        trailing: impl Into<String>,
    ) -> Self {
        Self {
            leading: leading.into(),
            counter: counter.into(),
            pad_width: pad_width.into(),
            trailing: trailing.into(),
        }
    }

    /// Render the display name for the current fields.
    pub fn render(&self) -> Result<String, NamingError> {
        compute_file_name(&self.leading, &self.counter, &self.pad_width, &self.trailing)
    }

    /// Advance the counter by one.
    ///
    /// Returns `Ok(false)` when the counter field is empty and there is
    /// nothing to advance.
    pub fn increment_counter(&mut self) -> Result<bool, NamingError> {
        match next_counter(&self.counter)? {
            Some(next) => {
                self.counter = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Compute an output file name (without extension).
///
/// The counter is rendered verbatim when it is empty or when the pad width is
/// empty or `"0"`. Otherwise both must be non-negative integers and the counter
/// is left-padded with zeros to `pad_width` digits.
pub fn compute_file_name(
    leading: &str,
    counter_text: &str,
    pad_width: &str,
    trailing: &str,
) -> Result<String, NamingError> {
    let counter = render_counter(counter_text.trim(), pad_width.trim())?;

    let parts = [leading.trim(), counter.as_str(), trailing.trim()];
    Ok(parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" "))
}

fn render_counter(counter: &str, pad_width: &str) -> Result<String, NamingError> {
    if counter.is_empty() || pad_width.is_empty() || pad_width == "0" {
        return Ok(counter.to_string());
    }

    let width: usize = pad_width
        .parse()
        .map_err(|_| NamingError::InvalidPadWidth(pad_width.to_string()))?;
    let number: u64 = counter
        .parse()
        .map_err(|_| NamingError::InvalidCounter(counter.to_string()))?;

    if width > MAX_PAD_WIDTH {
        return Err(NamingError::PadWidthTooLarge(width));
    }

    Ok(format!("{:0width$}", number, width = width))
}

/// The counter text that follows `counter_text`, or `None` when it is empty.
pub fn next_counter(counter_text: &str) -> Result<Option<String>, NamingError> {
    let trimmed = counter_text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let number: u64 = trimmed
        .parse()
        .map_err(|_| NamingError::InvalidCounter(trimmed.to_string()))?;
    let next = number
        .checked_add(1)
        .ok_or_else(|| NamingError::InvalidCounter(trimmed.to_string()))?;

    Ok(Some(next.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pads_counter_to_width() {
        assert_eq!(
            compute_file_name("IMG", "7", "3", "final").unwrap(),
            "IMG 007 final"
        );
    }

    #[test]
    fn zero_width_renders_plain_counter() {
        assert_eq!(
            compute_file_name("IMG", "7", "0", "final").unwrap(),
            "IMG 7 final"
        );
        assert_eq!(
            compute_file_name("IMG", "7", "", "final").unwrap(),
            "IMG 7 final"
        );
    }

    #[test]
    fn empty_counter_drops_segment() {
        assert_eq!(
            compute_file_name("IMG", "", "3", "final").unwrap(),
            "IMG final"
        );
    }

    #[test]
    fn counter_is_verbatim_without_padding() {
        // No padding requested, so nothing is parsed
        assert_eq!(compute_file_name("IMG", "007", "", "x").unwrap(), "IMG 007 x");
        assert_eq!(compute_file_name("IMG", "abc", "0", "x").unwrap(), "IMG abc x");
    }

    #[test]
    fn trims_leading_and_trailing() {
        assert_eq!(
            compute_file_name("  Chapter ", " 12 ", " 4 ", " draft  ").unwrap(),
            "Chapter 0012 draft"
        );
    }

    #[test]
    fn empty_parts_collapse_separators() {
        assert_eq!(compute_file_name("", "5", "2", "").unwrap(), "05");
        assert_eq!(compute_file_name("", "", "", "notes").unwrap(), "notes");
        assert_eq!(compute_file_name("", "", "", "").unwrap(), "");
    }

    #[test]
    fn rejects_non_numeric_counter() {
        assert_eq!(
            compute_file_name("IMG", "seven", "3", "final"),
            Err(NamingError::InvalidCounter("seven".to_string()))
        );
    }

    #[test]
    fn rejects_non_numeric_pad_width() {
        assert_eq!(
            compute_file_name("IMG", "7", "three", "final"),
            Err(NamingError::InvalidPadWidth("three".to_string()))
        );
    }

    #[test]
    fn rejects_oversized_pad_width() {
        assert_eq!(
            compute_file_name("IMG", "7", "65", "final"),
            Err(NamingError::PadWidthTooLarge(65))
        );
    }

    #[test]
    fn next_counter_advances() {
        assert_eq!(next_counter("7").unwrap(), Some("8".to_string()));
        assert_eq!(next_counter("009").unwrap(), Some("10".to_string()));
        assert_eq!(next_counter("  ").unwrap(), None);
        assert!(next_counter("x1").is_err());
        assert!(next_counter(&u64::MAX.to_string()).is_err());
    }

    #[test]
    fn increment_updates_rendered_name() {
        let mut naming = FileNameSpec::new("IMG", "9", "2", "final");
        assert_eq!(naming.render().unwrap(), "IMG 09 final");
        assert!(naming.increment_counter().unwrap());
        assert_eq!(naming.render().unwrap(), "IMG 10 final");
    }

    #[test]
    fn increment_without_counter_is_noop() {
        let mut naming = FileNameSpec::new("IMG", "", "2", "final");
        assert!(!naming.increment_counter().unwrap());
        assert_eq!(naming.counter, "");
    }

    proptest! {
        #[test]
        fn padded_counter_keeps_value(n in 0u64..10_000_000, width in 1usize..12) {
            let name = compute_file_name("", &n.to_string(), &width.to_string(), "").unwrap();
            prop_assert!(name.len() >= width);
            prop_assert_eq!(name.parse::<u64>().unwrap(), n);
        }

        #[test]
        fn rendered_name_has_no_outer_whitespace(
            leading in "[ a-z]{0,6}",
            trailing in "[ a-z]{0,6}",
            n in 0u64..1000,
        ) {
            let name = compute_file_name(&leading, &n.to_string(), "3", &trailing).unwrap();
            prop_assert_eq!(name.trim(), name.as_str());
            let padded = format!("{:03}", n);
            prop_assert!(name.contains(&padded), "missing padded counter in {:?}", name);
        }
    }
}

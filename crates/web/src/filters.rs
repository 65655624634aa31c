//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Longest venue description shown on the listing page, in characters.
pub const EXCERPT_CHARS: usize = 120;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Shortens text to [`EXCERPT_CHARS`], cutting at a word boundary.
///
/// Usage in templates: `{{ venue.description|excerpt }}`
#[askama::filter_fn]
pub fn excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(shorten(&value.to_string(), EXCERPT_CHARS))
}

fn shorten(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    let cut = cut
        .rsplit_once(char::is_whitespace)
        .map_or(cut.as_str(), |(head, _)| head)
        .trim_end();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(shorten("  A quiet hall ", 120), "A quiet hall");
    }

    #[test]
    fn test_long_text_cuts_at_word() {
        assert_eq!(shorten("Grand ballroom with river views", 14), "Grand…");
        assert_eq!(shorten("Grand ballroom with river views", 15), "Grand ballroom…");
    }

    #[test]
    fn test_single_long_word_is_hard_cut() {
        assert_eq!(shorten("abcdefghij", 4), "abcd…");
    }
}

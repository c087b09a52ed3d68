//! Neutralizes template delimiters in free text.
//!
//! Résumés and job descriptions legitimately contain `{` and `}` (code snippets,
//! JSON samples, templated job ads). The prompt template uses those characters
//! for placeholders, so they are swapped for their fullwidth lookalikes before
//! the text reaches the renderer.

use std::borrow::Cow;

pub const OPEN_DELIMITER: char = '{';
pub const CLOSE_DELIMITER: char = '}';

/// Fullwidth left curly bracket (U+FF5B).
pub const OPEN_REPLACEMENT: char = '\u{FF5B}';
/// Fullwidth right curly bracket (U+FF5D).
pub const CLOSE_REPLACEMENT: char = '\u{FF5D}';

/// Replaces both template delimiters with their fullwidth counterparts.
///
/// Idempotent: the replacements are never delimiters themselves.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !contains_delimiter(text) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| match c {
                OPEN_DELIMITER => OPEN_REPLACEMENT,
                CLOSE_DELIMITER => CLOSE_REPLACEMENT,
                other => other,
            })
            .collect(),
    )
}

pub fn contains_delimiter(text: &str) -> bool {
    text.contains(&[OPEN_DELIMITER, CLOSE_DELIMITER][..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_both_delimiters() {
        let out = sanitize("Built APIs returning {\"id\": 1} payloads");
        assert_eq!(out, "Built APIs returning \u{FF5B}\"id\": 1\u{FF5D} payloads");
        assert!(!contains_delimiter(&out));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "",
            "plain text",
            "{cv_text}",
            "{{nested}} and } stray {",
            "Kinh nghiệm {5 năm} với Rust",
        ];
        for sample in samples {
            let once = sanitize(sample).into_owned();
            let twice = sanitize(&once).into_owned();
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_sanitize_borrows_clean_text() {
        assert!(matches!(sanitize("no braces here"), Cow::Borrowed(_)));
    }
}

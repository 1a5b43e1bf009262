//! Search-term highlighting for rendered cells.

use std::borrow::Cow;

use regex::RegexBuilder;

/// Wraps every case-insensitive occurrence of `query` in `value` with
/// `<mark>` tags. The query is matched literally.
///
/// Returns `value` untouched when `query` is empty.
pub fn highlight<'a>(value: &'a str, query: &str) -> Cow<'a, str> {
    if query.is_empty() {
        return Cow::Borrowed(value);
    }

    let pattern = regex::escape(query);
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace_all(value, "<mark>$0</mark>"),
        // An escaped literal only fails to compile past the size limit
        Err(_) => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_case_insensitive() {
        assert_eq!(highlight("John Johnson", "john"), "<mark>John</mark> <mark>John</mark>son");
    }

    #[test]
    fn test_highlight_empty_query() {
        assert!(matches!(highlight("Ann", ""), Cow::Borrowed("Ann")));
    }

    #[test]
    fn test_highlight_escapes_metacharacters() {
        assert_eq!(highlight("+1 (555) 010", "(555)"), "+1 <mark>(555)</mark> 010");
        assert_eq!(highlight("a.b axb", "."), "a<mark>.</mark>b axb");
    }

    #[test]
    fn test_highlight_no_match() {
        assert_eq!(highlight("Ann", "bo"), "Ann");
    }
}

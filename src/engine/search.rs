//! Free-text search over a fixed set of fields

use crate::record::Record;

use super::filters::contains_ignore_case;

/// Fields searched when none are configured
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &["firstName", "lastName", "phone"];

/// Matches a query against the searchable fields of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatcher {
    fields: Vec<String>,
}

impl Default for SearchMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_FIELDS.iter().copied())
    }
}

impl SearchMatcher {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// True if any searchable field contains `query`, ignoring case.
    ///
    /// Records without any searchable value never match.
    pub fn matches<R: Record + ?Sized>(&self, record: &R, query: &str) -> bool {
        self.fields.iter().any(|field| {
            record
                .field(field)
                .is_some_and(|v| contains_ignore_case(&v.to_text(), query))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_any_search_field() {
        let matcher = SearchMatcher::default();
        let doc = json!({"firstName": "John", "lastName": "Smith", "phone": "+47 555 0101"});

        assert!(matcher.matches(&doc, "jo"));
        assert!(matcher.matches(&doc, "SMI"));
        assert!(matcher.matches(&doc, "555"));
        assert!(!matcher.matches(&doc, "zed"));
    }

    #[test]
    fn test_non_search_fields_ignored() {
        let matcher = SearchMatcher::default();
        let doc = json!({"firstName": "Ann", "city": "Johannesburg"});
        assert!(!matcher.matches(&doc, "johan"));
    }

    #[test]
    fn test_missing_fields_never_match() {
        let matcher = SearchMatcher::default();
        assert!(!matcher.matches(&json!({"firstName": null}), "a"));
        assert!(!matcher.matches(&json!({}), "a"));
    }

    #[test]
    fn test_custom_fields() {
        let matcher = SearchMatcher::new(["email"]);
        assert!(matcher.matches(&json!({"email": "ann@example.org"}), "EXAMPLE"));
        assert_eq!(matcher.fields(), &["email".to_string()]);
    }
}

//! Result sorting
//!
//! Sorts by a single field, stably and deterministically.

use std::cmp::Ordering;

use crate::query::{SortDirection, SortSpec};
use crate::record::{FieldValue, Record};

/// Sorts matched records
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records according to sort specification.
    ///
    /// Sort is stable in both directions: records with equal keys keep their
    /// input order. An unknown field leaves the order untouched.
    pub fn sort<R: Record>(records: &mut [&R], sort_spec: &SortSpec) {
        records.sort_by(|a, b| {
            let ordering = Self::compare_values(
                a.field(&sort_spec.field).as_ref(),
                b.field(&sort_spec.field).as_ref(),
            );

            match sort_spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    /// Missing values order before present ones.
    fn compare_values(a: Option<&FieldValue<'_>>, b: Option<&FieldValue<'_>>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => a_val.compare(b_val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn ids(records: &[&Value]) -> Vec<String> {
        records
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_sort_ascending() {
        let docs = [
            json!({"id": "c", "age": 30}),
            json!({"id": "a", "age": 20}),
            json!({"id": "b", "age": 25}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::asc("age"));
        assert_eq!(ids(&refs), ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let docs = [
            json!({"id": "c", "age": 30}),
            json!({"id": "a", "age": 20}),
            json!({"id": "b", "age": 25}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::desc("age"));
        assert_eq!(ids(&refs), ["c", "b", "a"]);
    }

    #[test]
    fn test_sort_stable_both_directions() {
        let docs = [
            json!({"id": "a", "age": 25}),
            json!({"id": "b", "age": 25}),
            json!({"id": "c", "age": 10}),
            json!({"id": "d", "age": 25}),
        ];

        let mut refs: Vec<&Value> = docs.iter().collect();
        ResultSorter::sort(&mut refs, &SortSpec::asc("age"));
        assert_eq!(ids(&refs), ["c", "a", "b", "d"]);

        let mut refs: Vec<&Value> = docs.iter().collect();
        ResultSorter::sort(&mut refs, &SortSpec::desc("age"));
        assert_eq!(ids(&refs), ["a", "b", "d", "c"]);
    }

    #[test]
    fn test_sort_by_string() {
        let docs = [
            json!({"id": "1", "name": "charlie"}),
            json!({"id": "2", "name": "alice"}),
            json!({"id": "3", "name": "bob"}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::asc("name"));
        assert_eq!(ids(&refs), ["2", "3", "1"]);
    }

    #[test]
    fn test_missing_values_first_ascending() {
        let docs = [
            json!({"id": "x", "name": "bob"}),
            json!({"id": "y"}),
            json!({"id": "z", "name": null}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::asc("name"));
        assert_eq!(ids(&refs), ["y", "z", "x"]);
    }

    #[test]
    fn test_unknown_field_keeps_order() {
        let docs = [json!({"id": "b"}), json!({"id": "a"}), json!({"id": "c"})];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::desc("nope"));
        assert_eq!(ids(&refs), ["b", "a", "c"]);
    }

    #[test]
    fn test_sort_dotted_dates_chronologically() {
        let docs = [
            json!({"id": "late", "dateOfBirth": "01.12.2001"}),
            json!({"id": "early", "dateOfBirth": "05.03.1990"}),
            json!({"id": "mid", "dateOfBirth": "1995/06/01"}),
        ];
        let mut refs: Vec<&Value> = docs.iter().collect();

        ResultSorter::sort(&mut refs, &SortSpec::asc("dateOfBirth"));
        assert_eq!(ids(&refs), ["early", "mid", "late"]);
    }
}

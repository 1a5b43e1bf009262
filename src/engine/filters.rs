//! Filter evaluation
//!
//! A record passes a filter list when it passes every active clause (AND),
//! and it passes a clause when any of the clause's tokens matches (OR).
//! A null or missing field never passes an active clause.

use chrono::Datelike;

use crate::query::FilterSpec;
use crate::record::{FieldValue, Record};

/// A filter token, resolved against the field it is applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken<'a> {
    /// Field is a date of birth and the age is at least the adult age
    Adults,
    /// Field is a date of birth and the age is below the adult age
    NotAdults,
    /// Field is truthy
    Active,
    /// Field is falsy
    NotActive,
    /// Case-insensitive substring of the field text
    Contains(&'a str),
}

impl<'a> FilterToken<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token {
            "ADULTS" => FilterToken::Adults,
            "NOT_ADULTS" => FilterToken::NotAdults,
            "ACTIVE" => FilterToken::Active,
            "NOT_ACTIVE" => FilterToken::NotActive,
            other => FilterToken::Contains(other),
        }
    }
}

/// Evaluates filter clauses against records
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator {
    reference_year: i32,
    adult_age: i32,
}

impl FilterEvaluator {
    pub fn new(reference_year: i32, adult_age: i32) -> Self {
        Self {
            reference_year,
            adult_age,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn adult_age(&self) -> i32 {
        self.adult_age
    }

    /// Checks if a record passes all filter clauses
    pub fn matches<R: Record + ?Sized>(&self, record: &R, filters: &[FilterSpec]) -> bool {
        filters
            .iter()
            .filter(|f| f.is_active())
            .all(|f| self.matches_clause(record, f))
    }

    fn matches_clause<R: Record + ?Sized>(&self, record: &R, filter: &FilterSpec) -> bool {
        let value = match record.field(&filter.field) {
            Some(v) => v,
            None => return false,
        };

        filter
            .values
            .iter()
            .any(|token| self.matches_token(&value, &FilterToken::parse(token)))
    }

    fn matches_token(&self, value: &FieldValue<'_>, token: &FilterToken<'_>) -> bool {
        match token {
            FilterToken::Adults => self.age(value).is_some_and(|age| age >= self.adult_age),
            FilterToken::NotAdults => self.age(value).is_some_and(|age| age < self.adult_age),
            FilterToken::Active => value.is_truthy(),
            FilterToken::NotActive => !value.is_truthy(),
            FilterToken::Contains(needle) => contains_ignore_case(&value.to_text(), needle),
        }
    }

    /// Whole years between the birth year and the reference year.
    /// Month and day are not taken into account.
    fn age(&self, value: &FieldValue<'_>) -> Option<i32> {
        value
            .as_date()
            .map(|born| self.reference_year - born.year())
    }
}

/// Case-insensitive substring test
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

//! Query state
//!
//! The single descriptor that says which page of which view comes next.
//!
//! # Invariants
//!
//! - `size` is fixed at construction and always > 0
//! - setting the query, the sort or the filters resets `page` to 0
//! - `page` only ever advances by one, through `next_page`

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(rename = "ascend", alias = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "descend", alias = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    /// Wire name of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascend",
            SortDirection::Descending => "descend",
        }
    }

    /// Parses a wire direction. Empty or unknown strings mean "no sort".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascend" | "asc" | "ascending" => Some(SortDirection::Ascending),
            "descend" | "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A filter clause: the field must match at least one of `values`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Field to filter on
    pub field: String,
    /// Accepted tokens (OR)
    #[serde(rename = "value", default)]
    pub values: Vec<String>,
}

impl FilterSpec {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A clause with no values does not constrain anything
    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Page, search, sort and filter descriptor driving the next fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: usize,
    size: usize,
    query: String,
    sort: Option<SortSpec>,
    filters: Vec<FilterSpec>,
}

impl QueryState {
    /// Creates a state on page 0 with no query, sort or filters.
    pub fn new(size: usize) -> QueryResult<Self> {
        if size == 0 {
            return Err(QueryError::InvalidPageSize(0));
        }
        Ok(Self {
            page: 0,
            size,
            query: String::new(),
            sort: None,
            filters: Vec::new(),
        })
    }

    pub(crate) fn from_parts(
        page: usize,
        size: usize,
        query: String,
        sort: Option<SortSpec>,
        filters: Vec<FilterSpec>,
    ) -> QueryResult<Self> {
        let mut state = Self::new(size)?;
        state.page = page;
        state.query = query;
        state.sort = sort;
        state.filters = filters;
        Ok(state)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// Index of the first row of the current page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Sets the free-text query and resets to page 0
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
    }

    /// Sets sort and filters together and resets to page 0
    pub fn set_sort_and_filters(&mut self, sort: Option<SortSpec>, filters: Vec<FilterSpec>) {
        self.sort = sort;
        self.filters = filters;
        self.page = 0;
    }

    /// Advances to the next page
    pub fn next_page(&mut self) {
        self.page += 1;
    }
}

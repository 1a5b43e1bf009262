//! Result types for query execution

use serde::{Deserialize, Serialize};

/// One page of a filtered, searched and sorted view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageableResult<R> {
    /// Rows of the requested page, in view order
    pub content: Vec<R>,
    /// True when no rows remain after this page
    pub completed: bool,
}

impl<R> PageableResult<R> {
    /// An empty, completed page
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            completed: true,
        }
    }

    /// Returns true if the page has no rows
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of rows on the page
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.content.iter()
    }

    /// Converts every row, keeping the completion flag
    pub fn map<T>(self, f: impl FnMut(R) -> T) -> PageableResult<T> {
        PageableResult {
            content: self.content.into_iter().map(f).collect(),
            completed: self.completed,
        }
    }
}

/// Row counts observed while computing a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Rows in the dataset
    pub scanned: usize,
    /// Rows left after the filter stage
    pub filtered: usize,
    /// Rows left after the search stage
    pub matched: usize,
    /// Rows on the returned page
    pub returned: usize,
}

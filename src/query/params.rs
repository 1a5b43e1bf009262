//! Table query parameters
//!
//! A table header reports the sort order and filter selection of every
//! column, active or not. This module reduces that report to the sort and
//! filters the coordinator understands.

use serde::{Deserialize, Serialize};

use super::state::{FilterSpec, SortDirection, SortSpec};

/// Sort state of one column; `None` means the column is not sorted.
/// Columns without a key are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<SortDirection>,
}

/// Filter state of one column; `None` means nothing is selected.
/// Columns without a key are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<Vec<String>>,
}

/// Per-column sort and filter state raised by a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQueryParams {
    #[serde(default)]
    pub sort: Vec<ColumnSort>,
    #[serde(default)]
    pub filter: Vec<ColumnFilter>,
}

impl TableQueryParams {
    /// The first sorted column wins; unselected and keyless filters are
    /// dropped.
    pub fn into_query(self) -> (Option<SortSpec>, Vec<FilterSpec>) {
        let sort = self.sort.into_iter().find_map(|col| {
            col.key
                .zip(col.value)
                .map(|(field, direction)| SortSpec { field, direction })
        });

        let filters = self
            .filter
            .into_iter()
            .filter_map(|col| {
                col.key
                    .zip(col.value)
                    .map(|(field, values)| FilterSpec { field, values })
            })
            .collect();

        (sort, filters)
    }
}

//! Wire shape of a query
//!
//! ```json
//! {"page": 0, "size": 20, "query": "jo",
//!  "sort": {"field": "lastName", "direction": "ascend"},
//!  "filters": [{"field": "isActive", "value": ["ACTIVE"]}]}
//! ```
//!
//! The wire form is lenient: a sort with an empty field or direction means
//! "no sort", and filters with a null field are ignored.

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};
use super::state::{FilterSpec, QueryState, SortDirection, SortSpec};

/// Query descriptor as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    #[serde(default)]
    pub page: i64,
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<WireSort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<WireFilter>>,
}

/// Sort as sent by clients; empty strings mean "no sort"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSort {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: String,
}

/// Filter as sent by clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFilter {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<Vec<String>>,
}

impl WireSort {
    fn into_spec(self) -> Option<SortSpec> {
        if self.field.is_empty() {
            return None;
        }
        let direction = SortDirection::parse(&self.direction)?;
        Some(SortSpec {
            field: self.field,
            direction,
        })
    }
}

impl TryFrom<QueryDescriptor> for QueryState {
    type Error = QueryError;

    fn try_from(desc: QueryDescriptor) -> QueryResult<Self> {
        if desc.size <= 0 {
            return Err(QueryError::InvalidPageSize(desc.size));
        }
        if desc.page < 0 {
            return Err(QueryError::InvalidPage(desc.page));
        }

        let sort = desc.sort.and_then(WireSort::into_spec);
        let filters = desc
            .filters
            .unwrap_or_default()
            .into_iter()
            .filter_map(|f| {
                let field = f.field?;
                Some(FilterSpec {
                    field,
                    values: f.value.unwrap_or_default(),
                })
            })
            .collect();

        QueryState::from_parts(
            desc.page as usize,
            desc.size as usize,
            desc.query.unwrap_or_default(),
            sort,
            filters,
        )
    }
}

impl From<&QueryState> for QueryDescriptor {
    fn from(state: &QueryState) -> Self {
        let filters: Vec<WireFilter> = state
            .filters()
            .iter()
            .map(|f| WireFilter {
                field: Some(f.field.clone()),
                value: Some(f.values.clone()),
            })
            .collect();

        Self {
            page: state.page() as i64,
            size: state.size() as i64,
            query: (!state.query().is_empty()).then(|| state.query().to_string()),
            sort: state.sort().map(|s| WireSort {
                field: s.field.clone(),
                direction: s.direction.as_str().to_string(),
            }),
            filters: (!filters.is_empty()).then_some(filters),
        }
    }
}

impl QueryDescriptor {
    /// Parses and validates a descriptor from JSON text
    pub fn parse_state(json: &str) -> Result<QueryState, DescriptorError> {
        let desc: QueryDescriptor = serde_json::from_str(json)?;
        Ok(QueryState::try_from(desc)?)
    }
}

/// Failure to turn JSON text into a query state
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Malformed query descriptor: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] QueryError),
}

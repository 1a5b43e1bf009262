//! Query descriptors for pageflow
//!
//! `QueryState` is the in-memory descriptor the coordinator mutates.
//! `QueryDescriptor` is its wire form and `TableQueryParams` is the per-column
//! report a table raises when the user sorts or filters.

mod descriptor;
mod errors;
mod params;
mod state;

pub use descriptor::{DescriptorError, QueryDescriptor, WireFilter, WireSort};
pub use errors::{QueryError, QueryResult};
pub use params::{ColumnFilter, ColumnSort, TableQueryParams};
pub use state::{FilterSpec, QueryState, SortDirection, SortSpec};

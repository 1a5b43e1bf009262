//! pageflow - incremental filter, search, sort and paging over in-memory datasets
//!
//! A `QueryEngine` computes one page of a view; a `PageLoadCoordinator`
//! turns search, sort, filter and scroll gestures into fetches and keeps the
//! visible list consistent.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod highlight;
pub mod observability;
pub mod query;
pub mod record;
pub mod session;

pub use config::SessionConfig;
pub use engine::{PageableResult, QueryEngine};
pub use query::{FilterSpec, QueryState, SortDirection, SortSpec};
pub use session::{DataProvider, PageLoadCoordinator, Resolution};

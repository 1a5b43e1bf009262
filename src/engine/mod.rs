//! Query engine for pageflow
//!
//! Pure, stateless evaluation of a `QueryState` over an in-memory dataset.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter records (AND across clauses, OR within a clause)
//! 2. Narrow by the free-text query
//! 3. Apply sort (if specified), stably
//! 4. Slice the requested page
//!
//! # Guarantees
//!
//! - Deterministic: same dataset + same state = same page
//! - The dataset is never mutated
//! - Unknown fields and tokens match nothing instead of failing

mod engine;
mod filters;
mod result;
mod search;
mod sorter;

pub use engine::{QueryEngine, DEFAULT_ADULT_AGE};
pub use filters::{FilterEvaluator, FilterToken};
pub use result::{ApplyStats, PageableResult};
pub use search::{SearchMatcher, DEFAULT_SEARCH_FIELDS};
pub use sorter::ResultSorter;

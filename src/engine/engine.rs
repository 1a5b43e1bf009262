//! Query engine
//!
//! Computes one page of a view over an in-memory dataset.
//!
//! Execution flow (strict order):
//! 1. Filter records by every active filter clause
//! 2. Narrow by the free-text query over the searchable fields
//! 3. Apply sort (if specified), stably
//! 4. Slice the requested page and derive `completed`

use chrono::{Datelike, Local};

use crate::observability::{Event, Logger, Severity};
use crate::query::{QueryDescriptor, QueryResult, QueryState};
use crate::record::Record;

use super::filters::FilterEvaluator;
use super::result::{ApplyStats, PageableResult};
use super::search::SearchMatcher;
use super::sorter::ResultSorter;

/// Age at which the `ADULTS` filter token starts matching
pub const DEFAULT_ADULT_AGE: i32 = 18;

/// Stateless filter/search/sort/paginate engine
#[derive(Debug, Clone)]
pub struct QueryEngine {
    filter: FilterEvaluator,
    search: SearchMatcher,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// Creates an engine that computes ages against the current local year
    pub fn new() -> Self {
        Self::with_reference_year(Local::now().year())
    }

    /// Creates an engine that computes ages against `year`
    pub fn with_reference_year(year: i32) -> Self {
        Self {
            filter: FilterEvaluator::new(year, DEFAULT_ADULT_AGE),
            search: SearchMatcher::default(),
        }
    }

    /// Replaces the searchable fields
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = SearchMatcher::new(fields);
        self
    }

    /// Replaces the reference year and adult age used by `ADULTS` / `NOT_ADULTS`
    pub fn age_rule(mut self, reference_year: i32, adult_age: i32) -> Self {
        self.filter = FilterEvaluator::new(reference_year, adult_age);
        self
    }

    pub fn searchable_fields(&self) -> &[String] {
        self.search.fields()
    }

    /// Year ages are computed against
    pub fn reference_year(&self) -> i32 {
        self.filter.reference_year()
    }

    /// Applies `state` to `dataset` and returns the requested page.
    ///
    /// This method is deterministic and leaves `dataset` untouched.
    pub fn apply<R: Record + Clone>(&self, dataset: &[R], state: &QueryState) -> PageableResult<R> {
        self.apply_with_stats(dataset, state).0
    }

    /// Validates a wire descriptor, then applies it
    pub fn apply_descriptor<R: Record + Clone>(
        &self,
        dataset: &[R],
        descriptor: QueryDescriptor,
    ) -> QueryResult<PageableResult<R>> {
        match QueryState::try_from(descriptor) {
            Ok(state) => Ok(self.apply(dataset, &state)),
            Err(e) => {
                Logger::event(
                    Event::QueryRejected,
                    &[("code", e.code()), ("reason", &e.to_string())],
                );
                Err(e)
            }
        }
    }

    /// Same as `apply`, also returning per-stage row counts
    pub fn apply_with_stats<R: Record + Clone>(
        &self,
        dataset: &[R],
        state: &QueryState,
    ) -> (PageableResult<R>, ApplyStats) {
        let mut stats = ApplyStats {
            scanned: dataset.len(),
            ..ApplyStats::default()
        };

        // Step 1: Filter
        let mut view: Vec<&R> = dataset
            .iter()
            .filter(|r| self.filter.matches(*r, state.filters()))
            .collect();
        stats.filtered = view.len();

        // Step 2: Search
        if !state.query().is_empty() {
            view.retain(|r| self.search.matches(*r, state.query()));
        }
        stats.matched = view.len();

        // Step 3: Sort
        if let Some(sort_spec) = state.sort() {
            ResultSorter::sort(&mut view, sort_spec);
        }

        // Step 4: Paginate
        let start = state.offset();
        let end = start.saturating_add(state.size());
        let content: Vec<R> = view
            .iter()
            .skip(start)
            .take(state.size())
            .map(|r| (*r).clone())
            .collect();
        stats.returned = content.len();

        let result = PageableResult {
            content,
            completed: end >= view.len(),
        };

        if Logger::enabled(Severity::Trace) {
            Self::log_stats(state, &stats, result.completed);
        }

        (result, stats)
    }

    fn log_stats(state: &QueryState, stats: &ApplyStats, completed: bool) {
        Logger::event(
            Event::QueryApplied,
            &[
                ("page", &state.page().to_string()),
                ("size", &state.size().to_string()),
                ("scanned", &stats.scanned.to_string()),
                ("filtered", &stats.filtered.to_string()),
                ("matched", &stats.matched.to_string()),
                ("returned", &stats.returned.to_string()),
                ("completed", if completed { "true" } else { "false" }),
            ],
        );
    }
}

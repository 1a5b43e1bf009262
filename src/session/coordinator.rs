//! # Page Load Coordinator
//!
//! Turns user gestures into query state transitions and fetches.
//!
//! Every gesture runs in three steps:
//!
//! 1. `begin_*` mutates the query state synchronously and issues a
//!    `FetchTicket` tagged with a fresh generation and a state snapshot
//! 2. `fetch` asks the provider for the dataset and applies the snapshot.
//!    The returned future owns everything it needs, so several may be in
//!    flight while new gestures arrive
//! 3. `resolve` merges the page into the visible list, unless a newer
//!    ticket has been issued in the meantime, in which case the result is
//!    dropped
//!
//! The `on_*` methods run the three steps back to back.
//!
//! ## Invariants
//!
//! - Search, sort and filter changes reset to page 0 and replace the list
//! - Load-more advances exactly one page and appends
//! - Load-more does nothing once the view is complete or while a fetch of
//!   the current generation is pending
//! - A failed fetch undoes only its own gesture's state change

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::accumulator::ResultAccumulator;
use super::errors::{SessionError, SessionResult, TransportError};
use super::events::{EventReceiver, EventSender, FetchMode, SessionEvent};
use super::provider::DataProvider;
use crate::config::SessionConfig;
use crate::engine::{PageableResult, QueryEngine};
use crate::observability::{Event, Logger};
use crate::query::{FilterSpec, QueryState, SortSpec, TableQueryParams};

/// A fetch issued for one gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    mode: FetchMode,
    snapshot: QueryState,
    rollback: QueryState,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// The query state the fetch was issued for
    pub fn state(&self) -> &QueryState {
        &self.snapshot
    }
}

/// A completed fetch waiting to be resolved
#[derive(Debug)]
pub struct Fetched<R> {
    ticket: FetchTicket,
    outcome: Result<PageableResult<R>, TransportError>,
}

impl<R> Fetched<R> {
    pub fn ticket(&self) -> &FetchTicket {
        &self.ticket
    }
}

/// What happened to a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The page was merged into the visible list
    Applied {
        mode: FetchMode,
        /// Rows merged into the list
        added: usize,
        completed: bool,
    },
    /// A newer gesture superseded this one; the result was dropped
    Stale,
    /// The gesture was refused without fetching
    Skipped,
}

/// Drives query state and the visible list from user gestures
pub struct PageLoadCoordinator<P: DataProvider> {
    id: Uuid,
    provider: Arc<P>,
    engine: Arc<QueryEngine>,
    state: QueryState,
    accumulator: ResultAccumulator<P::Record>,
    generation: u64,
    pending: Option<u64>,
    events: Option<EventSender>,
}

impl<P: DataProvider> PageLoadCoordinator<P> {
    /// Creates a session with a default engine and the given page size
    pub fn new(provider: P, page_size: usize) -> SessionResult<Self> {
        Self::with_engine(Arc::new(provider), QueryEngine::new(), page_size)
    }

    /// Creates a session from loaded configuration
    pub fn from_config(provider: Arc<P>, config: &SessionConfig) -> SessionResult<Self> {
        Self::with_engine(provider, config.engine(), config.page_size)
    }

    /// Creates a session with an explicit engine
    pub fn with_engine(
        provider: Arc<P>,
        engine: QueryEngine,
        page_size: usize,
    ) -> SessionResult<Self> {
        let state = QueryState::new(page_size).map_err(SessionError::Configuration)?;
        let id = Uuid::new_v4();

        Logger::event(
            Event::SessionStart,
            &[
                ("session", &id.to_string()),
                ("page_size", &page_size.to_string()),
            ],
        );

        Ok(Self {
            id,
            provider,
            engine: Arc::new(engine),
            state,
            accumulator: ResultAccumulator::new(),
            generation: 0,
            pending: None,
            events: None,
        })
    }

    /// Returns a receiver for session events, replacing any previous one
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current query state, including gestures still in flight
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Visible rows
    pub fn visible(&self) -> &[P::Record] {
        self.accumulator.visible()
    }

    /// True when the last merged page was the final one
    pub fn completed(&self) -> bool {
        self.accumulator.completed()
    }

    /// True while the latest ticket has not been resolved
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    // ==================
    // Gestures
    // ==================

    /// Initial load with the default state
    pub fn begin_init(&mut self) -> FetchTicket {
        let rollback = self.state.clone();
        self.issue(FetchMode::Replace, rollback)
    }

    /// Search text changed: new query, back to page 0
    pub fn begin_search(&mut self, text: impl Into<String>) -> FetchTicket {
        let rollback = self.state.clone();
        self.state.set_query(text);
        self.issue(FetchMode::Replace, rollback)
    }

    /// Sort or filters changed: back to page 0. `None` clears the sort.
    pub fn begin_sort_or_filter(
        &mut self,
        sort: Option<SortSpec>,
        filters: Vec<FilterSpec>,
    ) -> FetchTicket {
        let rollback = self.state.clone();
        self.state.set_sort_and_filters(sort, filters);
        self.issue(FetchMode::Replace, rollback)
    }

    /// Sort or filters changed, as reported by a table header
    pub fn begin_table_query_params(&mut self, params: TableQueryParams) -> FetchTicket {
        let (sort, filters) = params.into_query();
        self.begin_sort_or_filter(sort, filters)
    }

    /// Next page requested. Returns `None` when the request is refused.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        let reason = if self.accumulator.completed() {
            Some("completed")
        } else if self.pending.is_some() {
            Some("in_flight")
        } else {
            None
        };

        if let Some(reason) = reason {
            Logger::event(
                Event::LoadMoreSkipped,
                &[("session", &self.id.to_string()), ("reason", reason)],
            );
            return None;
        }

        let rollback = self.state.clone();
        self.state.next_page();
        Some(self.issue(FetchMode::Append, rollback))
    }

    fn issue(&mut self, mode: FetchMode, rollback: QueryState) -> FetchTicket {
        self.generation += 1;
        self.pending = Some(self.generation);

        Logger::event(
            Event::FetchBegin,
            &[
                ("session", &self.id.to_string()),
                ("generation", &self.generation.to_string()),
                ("mode", mode.as_str()),
                ("page", &self.state.page().to_string()),
            ],
        );

        FetchTicket {
            generation: self.generation,
            mode,
            snapshot: self.state.clone(),
            rollback,
        }
    }

    // ==================
    // Fetch and resolve
    // ==================

    /// Fetches the dataset and computes the ticket's page.
    ///
    /// The future does not borrow the coordinator.
    pub fn fetch(
        &self,
        ticket: FetchTicket,
    ) -> impl Future<Output = Fetched<P::Record>> + Send + 'static {
        let provider = Arc::clone(&self.provider);
        let engine = Arc::clone(&self.engine);

        async move {
            let outcome = provider
                .fetch_all()
                .await
                .map(|rows| engine.apply(rows.as_slice(), &ticket.snapshot));
            Fetched { ticket, outcome }
        }
    }

    /// Merges a fetch into the visible list.
    ///
    /// Results of superseded tickets are dropped, failures included.
    pub fn resolve(&mut self, fetched: Fetched<P::Record>) -> SessionResult<Resolution> {
        let Fetched { ticket, outcome } = fetched;

        if self.pending != Some(ticket.generation) {
            Logger::event(
                Event::FetchStale,
                &[
                    ("session", &self.id.to_string()),
                    ("generation", &ticket.generation.to_string()),
                    ("current", &self.generation.to_string()),
                ],
            );
            return Ok(Resolution::Stale);
        }
        self.pending = None;

        let result = match outcome {
            Ok(result) => result,
            Err(error) => return Err(self.fail(ticket, error)),
        };

        let completed = result.completed;
        let added = result.len();
        let changed = match ticket.mode {
            FetchMode::Replace => {
                self.accumulator.replace(result.content, completed);
                true
            }
            FetchMode::Append => self.accumulator.append(result.content, completed),
        };

        Logger::event(
            Event::FetchApplied,
            &[
                ("session", &self.id.to_string()),
                ("generation", &ticket.generation.to_string()),
                ("mode", ticket.mode.as_str()),
                ("added", &added.to_string()),
                ("visible", &self.accumulator.len().to_string()),
                ("completed", if completed { "true" } else { "false" }),
            ],
        );

        let added = if changed { added } else { 0 };
        if changed {
            self.publish(SessionEvent::VisibleListChanged {
                mode: ticket.mode,
                added,
                total: self.accumulator.len(),
                completed,
            });
        }

        Ok(Resolution::Applied {
            mode: ticket.mode,
            added,
            completed,
        })
    }

    /// Undoes the failed ticket's own state change. Only the current ticket
    /// reaches here, so no newer gesture has mutated the state since.
    fn fail(&mut self, ticket: FetchTicket, error: TransportError) -> SessionError {
        let mode = ticket.mode;
        self.state = ticket.rollback;

        Logger::event(
            Event::FetchFailed,
            &[
                ("session", &self.id.to_string()),
                ("mode", mode.as_str()),
                ("code", error.code()),
                ("reason", &error.to_string()),
            ],
        );
        self.publish(SessionEvent::FetchFailed {
            mode,
            error: error.clone(),
        });

        SessionError::Transport(error)
    }

    fn publish(&mut self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                self.events = None;
            }
        }
    }

    async fn run(&mut self, ticket: FetchTicket) -> SessionResult<Resolution> {
        let fetched = self.fetch(ticket).await;
        self.resolve(fetched)
    }

    // ==================
    // One-shot gestures
    // ==================

    pub async fn on_init(&mut self) -> SessionResult<Resolution> {
        let ticket = self.begin_init();
        self.run(ticket).await
    }

    pub async fn on_search_changed(&mut self, text: impl Into<String>) -> SessionResult<Resolution> {
        let ticket = self.begin_search(text);
        self.run(ticket).await
    }

    pub async fn on_sort_or_filter_changed(
        &mut self,
        sort: Option<SortSpec>,
        filters: Vec<FilterSpec>,
    ) -> SessionResult<Resolution> {
        let ticket = self.begin_sort_or_filter(sort, filters);
        self.run(ticket).await
    }

    pub async fn on_table_query_params(
        &mut self,
        params: TableQueryParams,
    ) -> SessionResult<Resolution> {
        let ticket = self.begin_table_query_params(params);
        self.run(ticket).await
    }

    pub async fn on_load_more(&mut self) -> SessionResult<Resolution> {
        match self.begin_load_more() {
            Some(ticket) => self.run(ticket).await,
            None => Ok(Resolution::Skipped),
        }
    }
}

impl<P: DataProvider> fmt::Debug for PageLoadCoordinator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLoadCoordinator")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("visible", &self.accumulator.len())
            .field("completed", &self.accumulator.completed())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<P: DataProvider> Drop for PageLoadCoordinator<P> {
    fn drop(&mut self) {
        Logger::event(
            Event::SessionEnd,
            &[
                ("session", &self.id.to_string()),
                ("visible", &self.accumulator.len().to_string()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::provider::{Dataset, InMemoryProvider};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn people(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "id": i,
                    "firstName": format!("Person{}", i),
                    "isActive": i % 5 == 0,
                })
            })
            .collect()
    }

    fn session(n: usize, size: usize) -> PageLoadCoordinator<InMemoryProvider<Value>> {
        PageLoadCoordinator::with_engine(
            Arc::new(InMemoryProvider::new(people(n))),
            QueryEngine::with_reference_year(2024),
            size,
        )
        .unwrap()
    }

    fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    /// Provider that fails while `down` is set
    struct FlakyProvider {
        rows: Dataset<Value>,
        down: AtomicBool,
    }

    #[async_trait]
    impl DataProvider for FlakyProvider {
        type Record = Value;

        async fn fetch_all(&self) -> Result<Dataset<Value>, TransportError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(TransportError::Unavailable("offline".into()));
            }
            Ok(Arc::clone(&self.rows))
        }
    }

    #[test]
    fn test_zero_page_size_is_configuration_error() {
        let err = PageLoadCoordinator::new(InMemoryProvider::new(people(1)), 0).unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_init_then_load_more() {
        let mut s = session(25, 10);

        let r = s.on_init().await.unwrap();
        assert_eq!(
            r,
            Resolution::Applied {
                mode: FetchMode::Replace,
                added: 10,
                completed: false
            }
        );

        s.on_load_more().await.unwrap();
        assert_eq!(s.state().page(), 1);
        assert_eq!(s.visible().len(), 20);

        let r = s.on_load_more().await.unwrap();
        assert_eq!(
            r,
            Resolution::Applied {
                mode: FetchMode::Append,
                added: 5,
                completed: true
            }
        );
        assert_eq!(ids(s.visible()), (0..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_load_more_after_completed_is_noop() {
        let provider = Arc::new(InMemoryProvider::new(people(5)));
        let mut s = PageLoadCoordinator::with_engine(
            Arc::clone(&provider),
            QueryEngine::with_reference_year(2024),
            10,
        )
        .unwrap();

        s.on_init().await.unwrap();
        assert!(s.completed());
        assert_eq!(provider.fetch_count(), 1);

        let r = s.on_load_more().await.unwrap();
        assert_eq!(r, Resolution::Skipped);
        assert_eq!(provider.fetch_count(), 1);
        assert_eq!(s.state().page(), 0);
        assert_eq!(s.visible().len(), 5);
    }

    #[tokio::test]
    async fn test_search_resets_page_and_replaces() {
        let mut s = session(25, 10);
        s.on_init().await.unwrap();
        s.on_load_more().await.unwrap();
        assert_eq!(s.state().page(), 1);

        s.on_search_changed("person2").await.unwrap();
        assert_eq!(s.state().page(), 0);
        assert_eq!(ids(s.visible()), vec![2, 20, 21, 22, 23, 24]);
        assert!(s.completed());
    }

    #[tokio::test]
    async fn test_filter_and_clear_sort() {
        let mut s = session(25, 10);
        s.on_init().await.unwrap();

        s.on_sort_or_filter_changed(
            Some(SortSpec::desc("id")),
            vec![FilterSpec::new("isActive", ["ACTIVE"])],
        )
        .await
        .unwrap();
        assert_eq!(ids(s.visible()), vec![20, 15, 10, 5, 0]);

        s.on_sort_or_filter_changed(None, vec![FilterSpec::new("isActive", ["ACTIVE"])])
            .await
            .unwrap();
        assert_eq!(ids(s.visible()), vec![0, 5, 10, 15, 20]);
    }

    #[tokio::test]
    async fn test_stale_result_dropped() {
        let mut s = session(25, 10);

        let first = s.begin_search("person1");
        let second = s.begin_search("person2");

        let late = s.fetch(first).await;
        let fresh = s.fetch(second).await;

        // Newer result resolves first, older arrives later
        assert!(matches!(s.resolve(fresh).unwrap(), Resolution::Applied { .. }));
        assert_eq!(s.resolve(late).unwrap(), Resolution::Stale);

        assert_eq!(s.state().query(), "person2");
        assert_eq!(ids(s.visible()), vec![2, 20, 21, 22, 23, 24]);
    }

    #[tokio::test]
    async fn test_older_result_arriving_first_is_dropped() {
        let mut s = session(25, 10);

        let first = s.begin_search("person1");
        let late = s.fetch(first).await;
        let second = s.begin_search("person2");

        assert_eq!(s.resolve(late).unwrap(), Resolution::Stale);
        assert!(s.is_pending());

        let fresh = s.fetch(second).await;
        s.resolve(fresh).unwrap();
        assert!(!s.is_pending());
        assert_eq!(s.visible().len(), 6);
    }

    #[tokio::test]
    async fn test_load_more_refused_while_pending() {
        let mut s = session(25, 10);
        let init = s.begin_init();

        assert!(s.begin_load_more().is_none());
        assert_eq!(s.state().page(), 0);

        let fetched = s.fetch(init).await;
        s.resolve(fetched).unwrap();
        assert!(s.begin_load_more().is_some());
    }

    #[tokio::test]
    async fn test_transport_error_restores_state() {
        let provider = Arc::new(FlakyProvider {
            rows: Arc::new(people(25)),
            down: AtomicBool::new(false),
        });
        let mut s = PageLoadCoordinator::with_engine(
            Arc::clone(&provider),
            QueryEngine::with_reference_year(2024),
            10,
        )
        .unwrap();
        let mut events = s.subscribe();

        s.on_init().await.unwrap();
        provider.down.store(true, Ordering::SeqCst);

        let err = s.on_load_more().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(s.state().page(), 0);
        assert_eq!(s.visible().len(), 10);

        let err = s.on_search_changed("person2").await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(s.state().query(), "");

        // Retrying the same gesture once the source is back
        provider.down.store(false, Ordering::SeqCst);
        s.on_load_more().await.unwrap();
        assert_eq!(s.state().page(), 1);
        assert_eq!(s.visible().len(), 20);

        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::VisibleListChanged { total: 10, .. }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::FetchFailed {
                mode: FetchMode::Append,
                ..
            }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::FetchFailed {
                mode: FetchMode::Replace,
                ..
            }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::VisibleListChanged {
                mode: FetchMode::Append,
                added: 10,
                total: 20,
                completed: false
            }
        ));
    }

    #[tokio::test]
    async fn test_failure_keeps_superseded_gesture() {
        let provider = Arc::new(FlakyProvider {
            rows: Arc::new(people(25)),
            down: AtomicBool::new(false),
        });
        let mut s = PageLoadCoordinator::with_engine(
            Arc::clone(&provider),
            QueryEngine::with_reference_year(2024),
            10,
        )
        .unwrap();
        s.on_init().await.unwrap();

        let search = s.begin_search("person2");
        let search = s.fetch(search).await;
        let sort = s.begin_sort_or_filter(Some(SortSpec::desc("id")), Vec::new());

        provider.down.store(true, Ordering::SeqCst);
        let sort = s.fetch(sort).await;

        assert_eq!(s.resolve(search).unwrap(), Resolution::Stale);
        let err = s.resolve(sort).unwrap_err();
        assert!(err.is_retryable());

        // Only the sort is undone; the search still stands
        assert_eq!(s.state().query(), "person2");
        assert!(s.state().sort().is_none());
        assert_eq!(s.state().page(), 0);
        assert!(!s.is_pending());

        provider.down.store(false, Ordering::SeqCst);
        s.on_sort_or_filter_changed(Some(SortSpec::desc("id")), Vec::new())
            .await
            .unwrap();
        assert_eq!(s.state().query(), "person2");
        assert_eq!(ids(s.visible()), vec![24, 23, 22, 21, 20, 2]);
    }

    #[tokio::test]
    async fn test_stale_failure_dropped_silently() {
        let provider = Arc::new(FlakyProvider {
            rows: Arc::new(people(25)),
            down: AtomicBool::new(false),
        });
        let mut s = PageLoadCoordinator::with_engine(
            Arc::clone(&provider),
            QueryEngine::with_reference_year(2024),
            10,
        )
        .unwrap();
        let mut events = s.subscribe();
        s.on_init().await.unwrap();
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::VisibleListChanged { .. }
        ));

        provider.down.store(true, Ordering::SeqCst);
        let failing = s.begin_search("person1");
        let failing = s.fetch(failing).await;
        provider.down.store(false, Ordering::SeqCst);
        let fresh = s.begin_search("person2");

        assert_eq!(s.resolve(failing).unwrap(), Resolution::Stale);
        assert!(events.try_recv().is_err());
        assert_eq!(s.state().query(), "person2");
        assert!(s.is_pending());
        assert_eq!(s.visible().len(), 10);

        let fresh = s.fetch(fresh).await;
        s.resolve(fresh).unwrap();
        assert_eq!(ids(s.visible()), vec![2, 20, 21, 22, 23, 24]);
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::VisibleListChanged { total: 6, .. }
        ));
    }

    #[tokio::test]
    async fn test_table_query_params() {
        let mut s = session(25, 10);
        let params: TableQueryParams = serde_json::from_value(json!({
            "sort": [{"key": "id", "value": "descend"}],
            "filter": [{"key": "isActive", "value": ["ACTIVE"]}]
        }))
        .unwrap();

        s.on_table_query_params(params).await.unwrap();
        assert_eq!(ids(s.visible()), vec![20, 15, 10, 5, 0]);
    }
}

//! Line-driven interactive session
//!
//! Each stdin line is one JSON event:
//!
//! ```text
//! {"event": "init"}
//! {"event": "search", "text": "jo"}
//! {"event": "queryParams", "params": {"sort": [...], "filter": [...]}}
//! {"event": "loadMore"}
//! {"event": "scroll", "scrollTop": 1100, "scrollHeight": 2000, "clientHeight": 800}
//! ```
//!
//! Search edits go through the debouncer. Fetches run concurrently with
//! input, so a slow fetch can be superseded before it lands. Every change
//! of the visible list is written to stdout.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::SessionConfig;
use crate::highlight::highlight;
use crate::query::TableQueryParams;
use crate::session::{
    spawn_debounced, FetchMode, FetchTicket, Fetched, JsonFileProvider, PageLoadCoordinator,
    ScrollTrigger, SessionEvent,
};

use super::errors::{CliErrorCode, CliResult};
use super::io::{write_error, write_response};

type Coordinator = PageLoadCoordinator<JsonFileProvider<Value>>;
type InFlight = FuturesUnordered<BoxFuture<'static, Fetched<Value>>>;

/// Inbound session event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InputEvent {
    Init,
    Search {
        #[serde(default)]
        text: String,
    },
    QueryParams {
        #[serde(default)]
        params: TableQueryParams,
    },
    LoadMore,
    #[serde(rename_all = "camelCase")]
    Scroll {
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    },
}

/// Runs the session until stdin closes and all work has drained
pub async fn run_session(
    provider: Arc<JsonFileProvider<Value>>,
    config: SessionConfig,
    with_highlight: bool,
) -> CliResult<()> {
    let mut coordinator = PageLoadCoordinator::from_config(provider, &config)?;
    let mut events = coordinator.subscribe();
    let mut scroll = config.scroll_trigger();

    let (search_tx, mut search_rx) = spawn_debounced::<String>(config.search_debounce());
    let mut search_tx = Some(search_tx);

    let mut in_flight: InFlight = FuturesUnordered::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match serde_json::from_str::<InputEvent>(&line) {
                        Ok(event) => {
                            dispatch(&mut coordinator, &mut scroll, &mut in_flight, &search_tx, event);
                        }
                        Err(e) => write_error(CliErrorCode::RequestError.code(), &e.to_string())?,
                    },
                    None => {
                        input_open = false;
                        // Closing the input flushes the pending search
                        search_tx = None;
                    }
                }
            }
            Some(text) = search_rx.recv() => {
                let ticket = coordinator.begin_search(text);
                spawn_fetch(&coordinator, &mut in_flight, ticket);
            }
            Some(fetched) = in_flight.next(), if !in_flight.is_empty() => {
                if let Err(e) = coordinator.resolve(fetched) {
                    if !e.is_retryable() {
                        return Err(e.into());
                    }
                }
                while let Ok(event) = events.try_recv() {
                    report(&coordinator, &mut scroll, &config, with_highlight, event)?;
                }
            }
            else => break,
        }
    }

    Ok(())
}

fn dispatch(
    coordinator: &mut Coordinator,
    scroll: &mut ScrollTrigger,
    in_flight: &mut InFlight,
    search_tx: &Option<tokio::sync::mpsc::UnboundedSender<String>>,
    event: InputEvent,
) {
    let ticket = match event {
        InputEvent::Init => Some(coordinator.begin_init()),
        InputEvent::Search { text } => {
            if let Some(tx) = search_tx {
                let _ = tx.send(text);
            }
            None
        }
        InputEvent::QueryParams { params } => Some(coordinator.begin_table_query_params(params)),
        InputEvent::LoadMore => coordinator.begin_load_more(),
        InputEvent::Scroll {
            scroll_top,
            scroll_height,
            client_height,
        } => {
            if scroll.observe(scroll_top, scroll_height, client_height) {
                coordinator.begin_load_more()
            } else {
                None
            }
        }
    };

    if let Some(ticket) = ticket {
        spawn_fetch(coordinator, in_flight, ticket);
    }
}

fn spawn_fetch(coordinator: &Coordinator, in_flight: &mut InFlight, ticket: FetchTicket) {
    in_flight.push(coordinator.fetch(ticket).boxed());
}

fn report(
    coordinator: &Coordinator,
    scroll: &mut ScrollTrigger,
    config: &SessionConfig,
    with_highlight: bool,
    event: SessionEvent,
) -> CliResult<()> {
    match event {
        SessionEvent::VisibleListChanged {
            mode,
            added,
            total,
            completed,
        } => {
            if mode == FetchMode::Replace {
                scroll.reset();
            }

            let query = coordinator.state().query();
            let content: Vec<Value> = coordinator
                .visible()
                .iter()
                .map(|row| {
                    if with_highlight {
                        highlight_row(row, &config.search_fields, query)
                    } else {
                        row.clone()
                    }
                })
                .collect();

            write_response(json!({
                "mode": mode,
                "added": added,
                "total": total,
                "completed": completed,
                "page": coordinator.state().page(),
                "content": content,
            }))
        }
        SessionEvent::FetchFailed { error, .. } => write_error(error.code(), &error.to_string()),
    }
}

/// Copies `row`, marking `query` in its searchable text fields
fn highlight_row(row: &Value, fields: &[String], query: &str) -> Value {
    let mut row = row.clone();
    if let Value::Object(map) = &mut row {
        for field in fields {
            if let Some(Value::String(text)) = map.get_mut(field) {
                let marked = highlight(text, query).into_owned();
                *text = marked;
            }
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_events() {
        let e: InputEvent = serde_json::from_str(r#"{"event": "search", "text": "jo"}"#).unwrap();
        assert_eq!(e, InputEvent::Search { text: "jo".into() });

        let e: InputEvent = serde_json::from_str(r#"{"event": "loadMore"}"#).unwrap();
        assert_eq!(e, InputEvent::LoadMore);

        let e: InputEvent = serde_json::from_str(
            r#"{"event": "scroll", "scrollTop": 10, "scrollHeight": 900, "clientHeight": 600}"#,
        )
        .unwrap();
        assert_eq!(
            e,
            InputEvent::Scroll {
                scroll_top: 10.0,
                scroll_height: 900.0,
                client_height: 600.0
            }
        );

        let e: InputEvent = serde_json::from_str(
            r#"{"event": "queryParams", "params": {"sort": [{"key": "lastName", "value": "ascend"}], "filter": []}}"#,
        )
        .unwrap();
        assert!(matches!(e, InputEvent::QueryParams { .. }));
    }

    #[test]
    fn test_query_params_event_with_keyless_column() {
        let e: InputEvent = serde_json::from_str(
            r#"{"event": "queryParams", "params": {"sort": [{"key": null, "value": null}], "filter": [{"key": null, "value": null}]}}"#,
        )
        .unwrap();

        match e {
            InputEvent::QueryParams { params } => {
                let (sort, filters) = params.into_query();
                assert!(sort.is_none());
                assert!(filters.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<InputEvent>(r#"{"event": "explode"}"#).is_err());
    }

    #[test]
    fn test_highlight_row_only_touches_search_fields() {
        let row = json!({"firstName": "Johanna", "lastName": "Berg", "note": "john"});
        let fields = vec!["firstName".to_string(), "lastName".to_string()];

        let marked = highlight_row(&row, &fields, "jo");
        assert_eq!(marked["firstName"], "<mark>Jo</mark>hanna");
        assert_eq!(marked["lastName"], "Berg");
        assert_eq!(marked["note"], "john");
    }
}

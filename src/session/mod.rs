//! # Session
//!
//! Client-side page-load session: gestures in, visible list out.

mod accumulator;
mod coordinator;
mod debounce;
mod errors;
mod events;
mod provider;
mod scroll;

pub use accumulator::ResultAccumulator;
pub use coordinator::{FetchTicket, Fetched, PageLoadCoordinator, Resolution};
pub use debounce::{spawn_debounced, Debouncer, DEFAULT_DEBOUNCE};
pub use errors::{SessionError, SessionResult, TransportError};
pub use events::{EventReceiver, EventSender, FetchMode, SessionEvent};
pub use provider::{DataProvider, Dataset, InMemoryProvider, JsonFileProvider};
pub use scroll::{ScrollTrigger, DEFAULT_SCROLL_THRESHOLD};

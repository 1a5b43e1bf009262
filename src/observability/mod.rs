//! Observability for pageflow
//!
//! Structured JSON logging with typed lifecycle events.
//!
//! # Usage
//!
//! ```ignore
//! use pageflow::observability::{Event, Logger, Severity};
//!
//! Logger::event(Event::FetchBegin, &[("mode", "replace"), ("page", "0")]);
//! Logger::log(Severity::Warn, "CUSTOM_EVENT", &[("rows", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

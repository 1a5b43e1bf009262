//! # Search Debounce
//!
//! Collapses bursts of search edits into one value. A value is released
//! once no newer value has arrived for the whole window; each new value
//! restarts the window and replaces the pending one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::observability::{Event, Logger};

/// Default quiet period before a search edit is released
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer driven by explicit timestamps
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a new value, superseding any pending one
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.window);
    }

    /// When the pending value becomes due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Releases the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }
}

/// Spawns a debouncing relay.
///
/// Values sent on the returned sender come out of the returned receiver
/// once the window passes quietly. Closing the sender flushes the last
/// pending value and then closes the receiver.
pub fn spawn_debounced<T>(window: Duration) -> (mpsc::UnboundedSender<T>, mpsc::UnboundedReceiver<T>)
where
    T: Send + 'static,
{
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<T>();
    let (output_tx, output_rx) = mpsc::unbounded_channel::<T>();

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(window);
        let mut superseded = 0usize;

        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                received = input_rx.recv() => match received {
                    Some(value) => {
                        if debouncer.is_pending() {
                            superseded += 1;
                        }
                        debouncer.push(value, Instant::now());
                    }
                    None => {
                        if let Some(value) = debouncer.flush() {
                            let _ = output_tx.send(value);
                        }
                        break;
                    }
                },
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(value) = debouncer.poll(Instant::now()) {
                        Logger::event(
                            Event::SearchDebounced,
                            &[("superseded", &superseded.to_string())],
                        );
                        superseded = 0;
                        if output_tx.send(value).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    (input_tx, output_rx)
}

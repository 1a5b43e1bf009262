//! CLI module for pageflow
//!
//! Provides command-line interface for:
//! - query: one-shot descriptor evaluation
//! - session: interactive, event-driven session
//! - generate: synthetic dataset

mod args;
mod commands;
mod errors;
mod io;
mod session;

pub use args::{Cli, Command};
pub use commands::{execute_query, generate, query, run, run_command, session};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
pub use session::InputEvent;

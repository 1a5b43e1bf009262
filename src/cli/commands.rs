//! CLI command implementations
//!
//! Each command loads configuration first, applies its log level, then does
//! its work. Responses go to stdout as JSON lines.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::SessionConfig;
use crate::dataset::generate_users;
use crate::engine::PageableResult;
use crate::query::QueryDescriptor;
use crate::session::{DataProvider, JsonFileProvider};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response};
use super::session::run_session;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { data, config } => query(&data, config.as_deref()),
        Command::Session {
            data,
            config,
            highlight,
        } => session(&data, config.as_deref(), highlight),
        Command::Generate { count, out, seed } => generate(count, &out, seed),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<SessionConfig> {
    let config = SessionConfig::load_or_default(path)?;
    config.apply_log_level()?;
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime_error(format!("Failed to create tokio runtime: {}", e)))
}

/// Execute a single query descriptor and exit
pub fn query(data: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let descriptor: QueryDescriptor = read_request()?;

    let result = execute_query(data, &config, descriptor)?;
    write_response(serde_json::to_value(result)?)
}

/// Fetches the dataset at `data` and applies `descriptor` to it
pub fn execute_query(
    data: &Path,
    config: &SessionConfig,
    descriptor: QueryDescriptor,
) -> CliResult<PageableResult<Value>> {
    let provider: JsonFileProvider = JsonFileProvider::new(data);
    let rows = runtime()?.block_on(provider.fetch_all())?;

    Ok(config.engine().apply_descriptor(rows.as_slice(), descriptor)?)
}

/// Run an interactive session until stdin closes
pub fn session(data: &Path, config_path: Option<&Path>, with_highlight: bool) -> CliResult<()> {
    let config = load_config(config_path)?;
    let provider = Arc::new(JsonFileProvider::new(data));

    runtime()?.block_on(run_session(provider, config, with_highlight))
}

/// Write a synthetic user dataset
pub fn generate(count: usize, out: &Path, seed: u64) -> CliResult<()> {
    let users = generate_users(count, seed);
    fs::write(out, serde_json::to_vec_pretty(&users)?)?;

    write_response(json!({
        "count": users.len(),
        "path": out.display().to_string(),
        "seed": seed,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, n: usize) -> PathBuf {
        let path = dir.path().join("users.json");
        generate(n, &path, 3).unwrap();
        path
    }

    #[test]
    fn test_generate_writes_users() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 12);

        let rows: Vec<Value> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(rows.len(), 12);
        assert!(rows[0].get("firstName").is_some());
        assert!(rows[0].get("dateOfBirth").is_some());
    }

    #[test]
    fn test_execute_query_pages() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 25);
        let config = SessionConfig::default();

        let desc: QueryDescriptor = serde_json::from_str(r#"{"page": 1, "size": 20}"#).unwrap();
        let result = execute_query(&path, &config, desc).unwrap();
        assert_eq!(result.len(), 5);
        assert!(result.completed);
    }

    #[test]
    fn test_execute_query_rejects_zero_size() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, 3);

        let desc: QueryDescriptor = serde_json::from_str(r#"{"page": 0, "size": 0}"#).unwrap();
        let err = execute_query(&path, &SessionConfig::default(), desc).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_execute_query_missing_dataset() {
        let dir = TempDir::new().unwrap();
        let desc: QueryDescriptor = serde_json::from_str(r#"{"page": 0, "size": 5}"#).unwrap();

        let err = execute_query(&dir.path().join("none.json"), &SessionConfig::default(), desc)
            .unwrap_err();
        assert_eq!(err.code(), CliErrorCode::TransportError);
    }
}

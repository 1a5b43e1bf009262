//! # Data Providers
//!
//! The remote source hands over the whole unfiltered collection on every
//! fetch. The session treats it as opaque: it may be slow, and it may fail.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::TransportError;
use crate::record::Record;

/// A fetched dataset, shared between the provider and in-flight fetches
pub type Dataset<R> = Arc<Vec<R>>;

/// Fetch-all data source
#[async_trait]
pub trait DataProvider: Send + Sync + 'static {
    /// Row type of the dataset
    type Record: Record + Clone + Send + Sync + 'static;

    /// Fetches the complete, unfiltered collection
    async fn fetch_all(&self) -> Result<Dataset<Self::Record>, TransportError>;
}

/// Provider over a dataset already in memory
pub struct InMemoryProvider<R> {
    rows: Dataset<R>,
    fetches: AtomicUsize,
}

impl<R> InMemoryProvider<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self::from_arc(Arc::new(rows))
    }

    pub fn from_arc(rows: Dataset<R>) -> Self {
        Self {
            rows,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch_all` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl<R> fmt::Debug for InMemoryProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryProvider")
            .field("rows", &self.rows.len())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

#[async_trait]
impl<R> DataProvider for InMemoryProvider<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    type Record = R;

    async fn fetch_all(&self) -> Result<Dataset<R>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.rows))
    }
}

/// Provider that reads a JSON array from a file on every fetch
pub struct JsonFileProvider<R = Value> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileProvider<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R> fmt::Debug for JsonFileProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileProvider")
            .field("path", &self.path)
            .finish()
    }
}

#[async_trait]
impl<R> DataProvider for JsonFileProvider<R>
where
    R: Record + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Record = R;

    async fn fetch_all(&self) -> Result<Dataset<R>, TransportError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| TransportError::Io(format!("{}: {}", self.path.display(), e)))?;
        let rows: Vec<R> = serde_json::from_slice(&bytes)?;
        Ok(Arc::new(rows))
    }
}

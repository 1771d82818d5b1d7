//! Live query execution seam.
//!
//! The interceptor wraps anything implementing [`QueryExecutor`]; the
//! trait is the unchanged contract of the backing document store. An
//! in-memory implementation is provided so the crate can be exercised
//! (and tested) without a real store.

use crate::error::{Error, Result};
use crate::query::{Query, ResultShape};
use crate::record::Record;
use crate::result::QueryResult;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

/// Executes a query against the live source of truth.
///
/// Implementations must not alter filter semantics; the interceptor only
/// decorates this call with cache lookup and population.
pub trait QueryExecutor<T: Record> {
    /// Run the query and produce its typed result.
    async fn run(&self, query: &Query) -> Result<QueryResult<T>>;
}

/// In-memory document store speaking the live execution contract.
///
/// Matches documents by field equality against the query filter. Useful
/// as a test repository and for demos; not a real query engine.
#[derive(Default)]
pub struct InMemoryExecutor {
    collections: DashMap<String, Vec<Value>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document into a collection. Documents keep insertion
    /// order, which is the order `find` results come back in.
    pub fn insert(&self, collection: &str, document: impl Serialize) -> Result<()> {
        let value =
            serde_json::to_value(document).map_err(|e| Error::ExecutorError(e.to_string()))?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    /// Number of documents currently stored in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn matches(document: &Value, filter: &serde_json::Map<String, Value>) -> bool {
        filter
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

impl<T: Record> QueryExecutor<T> for InMemoryExecutor {
    async fn run(&self, query: &Query) -> Result<QueryResult<T>> {
        let hits: Vec<Value> = self
            .collections
            .get(query.collection())
            .map(|docs| {
                docs.iter()
                    .filter(|doc| Self::matches(doc, query.filter()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match query.shape() {
            ResultShape::Single => hits
                .into_iter()
                .next()
                .map(|doc| {
                    serde_json::from_value(doc).map_err(|e| Error::ExecutorError(e.to_string()))
                })
                .transpose()
                .map(QueryResult::Single),
            ResultShape::Collection => hits
                .into_iter()
                .map(|doc| {
                    serde_json::from_value(doc).map_err(|e| Error::ExecutorError(e.to_string()))
                })
                .collect::<Result<Vec<T>>>()
                .map(QueryResult::Collection),
        }
    }
}

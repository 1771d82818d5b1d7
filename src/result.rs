//! Query results and the cached-payload envelope.
//!
//! A result is either a single record or an ordered sequence of records.
//! The serialized cache payload carries that shape explicitly in a tagged
//! envelope, so rehydration never has to guess from the structure of the
//! deserialized data.

use crate::error::{Error, Result};
use crate::query::ResultShape;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a query execution, live or rehydrated.
///
/// Rehydrated results are indistinguishable from live ones: same typed
/// records, same shape, same field values.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<T> {
    /// A find-one result: the matching record, or `None`.
    Single(Option<T>),
    /// A find result: every matching record, order preserved.
    Collection(Vec<T>),
}

impl<T> QueryResult<T> {
    /// Shape of this result.
    pub fn shape(&self) -> ResultShape {
        match self {
            QueryResult::Single(_) => ResultShape::Single,
            QueryResult::Collection(_) => ResultShape::Collection,
        }
    }

    /// The single record, if this is a `Single` result.
    pub fn single(&self) -> Option<&T> {
        match self {
            QueryResult::Single(record) => record.as_ref(),
            QueryResult::Collection(_) => None,
        }
    }

    /// The record sequence, if this is a `Collection` result.
    pub fn records(&self) -> Option<&[T]> {
        match self {
            QueryResult::Single(_) => None,
            QueryResult::Collection(records) => Some(records),
        }
    }
}

/// Serialized form stored in the cache.
///
/// Adjacently tagged: `{"shape":"single","data":...}` or
/// `{"shape":"collection","data":[...]}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "shape", content = "data", rename_all = "lowercase")]
enum Envelope {
    Single(Option<Value>),
    Collection(Vec<Value>),
}

/// Serialize a result into its cache payload. Called exactly once per
/// cache miss.
pub fn dehydrate<T: Record>(result: &QueryResult<T>) -> Result<String> {
    let envelope = match result {
        QueryResult::Single(record) => Envelope::Single(
            record
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| Error::SerializationError(e.to_string()))?,
        ),
        QueryResult::Collection(records) => Envelope::Collection(
            records
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::SerializationError(e.to_string()))?,
        ),
    };

    serde_json::to_string(&envelope).map_err(|e| Error::SerializationError(e.to_string()))
}

/// Reconstruct a typed result from a cached payload.
///
/// Applies the typed conversion element-wise for collections, once for a
/// single record. Fails with `DeserializationError` on a corrupt envelope
/// or a record that no longer matches `T`; the interceptor treats that as
/// a miss.
pub fn rehydrate<T: Record>(payload: &str) -> Result<QueryResult<T>> {
    let envelope: Envelope =
        serde_json::from_str(payload).map_err(|e| Error::DeserializationError(e.to_string()))?;

    match envelope {
        Envelope::Single(None) => Ok(QueryResult::Single(None)),
        Envelope::Single(Some(value)) => serde_json::from_value(value)
            .map(|record| QueryResult::Single(Some(record)))
            .map_err(|e| Error::DeserializationError(e.to_string())),
        Envelope::Collection(values) => values
            .into_iter()
            .map(|value| {
                serde_json::from_value(value)
                    .map_err(|e| Error::DeserializationError(e.to_string()))
            })
            .collect::<Result<Vec<T>>>()
            .map(QueryResult::Collection),
    }
}

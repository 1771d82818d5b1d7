//! Cache key derivation from query shape.

use crate::query::Query;
use serde_json::Value;
use std::collections::BTreeMap;

/// Derives deterministic cache keys from a query's filter and target
/// collection.
///
/// The key is the JSON serialization of the filter merged with a
/// `collection` entry. Fields are serialized through an ordered map, so
/// two logically identical filters always produce byte-identical keys
/// regardless of insertion order.
pub struct QueryKeyBuilder;

impl QueryKeyBuilder {
    /// Build a cache key from a filter and a collection name.
    ///
    /// A filter field literally named `collection` is overwritten by the
    /// collection name, matching the merge order used at population time.
    pub fn build(filter: &serde_json::Map<String, Value>, collection: &str) -> String {
        let mut merged: BTreeMap<&str, &Value> =
            filter.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let collection_value = Value::String(collection.to_string());
        merged.insert("collection", &collection_value);

        // Serializing a map of already-valid JSON values cannot fail.
        serde_json::to_string(&merged).expect("JSON map serialization is infallible")
    }

    /// Build the key for a query descriptor.
    pub fn for_query(query: &Query) -> String {
        Self::build(query.filter(), query.collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use proptest::prelude::*;
    use serde_json::Map;

    #[test]
    fn test_key_is_deterministic() {
        let query = Query::find("blogs").where_field("author", "u1");

        let first = QueryKeyBuilder::for_query(&query);
        let second = QueryKeyBuilder::for_query(&query);
        assert_eq!(first, second);
    }

    #[test]
    fn test_key_differs_by_collection() {
        let mut filter = Map::new();
        filter.insert("author".to_string(), "u1".into());

        let blogs = QueryKeyBuilder::build(&filter, "blogs");
        let posts = QueryKeyBuilder::build(&filter, "posts");
        assert_ne!(blogs, posts);
    }

    #[test]
    fn test_key_normalizes_field_order() {
        let a = Query::find("blogs")
            .where_field("author", "u1")
            .where_field("published", true);
        let b = Query::find("blogs")
            .where_field("published", true)
            .where_field("author", "u1");

        assert_eq!(
            QueryKeyBuilder::for_query(&a),
            QueryKeyBuilder::for_query(&b)
        );
    }

    #[test]
    fn test_collection_entry_wins_over_filter_field() {
        let query = Query::find("blogs").where_field("collection", "spoofed");

        let key = QueryKeyBuilder::for_query(&query);
        assert!(key.contains("\"collection\":\"blogs\""));
        assert!(!key.contains("spoofed"));
    }

    #[test]
    fn test_empty_filter_still_keyed_by_collection() {
        let filter = Map::new();
        let key = QueryKeyBuilder::build(&filter, "blogs");
        assert_eq!(key, "{\"collection\":\"blogs\"}");
    }

    proptest! {
        #[test]
        fn prop_key_determinism(fields in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{0,12}"), 0..6), collection in "[a-z]{1,10}") {
            let mut filter = Map::new();
            for (k, v) in &fields {
                filter.insert(k.clone(), v.clone().into());
            }

            let first = QueryKeyBuilder::build(&filter, &collection);
            let second = QueryKeyBuilder::build(&filter, &collection);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_key_distinguishes_collections(name in "[a-z]{1,10}", other in "[a-z]{1,10}") {
            prop_assume!(name != other);
            let filter = Map::new();
            prop_assert_ne!(
                QueryKeyBuilder::build(&filter, &name),
                QueryKeyBuilder::build(&filter, &other)
            );
        }
    }
}

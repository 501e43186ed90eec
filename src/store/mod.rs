// src/store/mod.rs

//! Path-addressable nested store shared by all tasks of one queue.
//!
//! The store holds a single JSON mapping, conventionally split into the
//! `meta`, `site` and `page` namespaces. Callers only reach the data through
//! path accessors ([`Store::get`], [`Store::set`], ...) and [`Store::dump`];
//! the underlying tree is never handed out mutably.

mod merge;
pub mod path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use self::merge::{get_in, merge_into, remove_in, set_in};
use self::path::parse_path;

/// Initial / partial store contents.
///
/// ```
/// use pagequeue::StoreData;
/// use serde_json::json;
///
/// let data: StoreData = serde_json::from_value(json!({
///     "site": { "name": "Example" },
///     "page": { "slug": "home" },
/// })).unwrap();
/// assert!(data.meta.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Map<String, Value>>,
}

impl StoreData {
    /// Top-level mapping with only the namespaces that are present.
    pub fn into_map(self) -> Map<String, Value> {
        [("meta", self.meta), ("site", self.site), ("page", self.page)]
            .into_iter()
            .filter_map(|(key, ns)| ns.map(|ns| (key.to_string(), Value::Object(ns))))
            .collect()
    }
}

/// The queue's store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Store {
    /// Always a `Value::Object`.
    data: Value,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl From<StoreData> for Store {
    fn from(data: StoreData) -> Self {
        Self::from_data(data)
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            data: Value::Object(Map::new()),
        }
    }

    /// Seed the store with `data`; its namespaces are moved in as-is.
    pub fn from_data(data: StoreData) -> Self {
        Self {
            data: Value::Object(data.into_map()),
        }
    }

    /// Value at `path`, or `None` if any segment is missing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_in(&self.data, &parse_path(path))
    }

    /// Owned value at `path`, or `fallback` if it is missing.
    ///
    /// An explicit `null` at `path` is returned as `null`, not as `fallback`.
    pub fn get_or(&self, path: &str, fallback: impl Into<Value>) -> Value {
        match self.get(path) {
            Some(value) => value.clone(),
            None => fallback.into(),
        }
    }

    /// Deserialize the value at `path` into `T`.
    ///
    /// Returns `None` if the path is missing or the value has another shape.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.get(path)?;
        T::deserialize(value).ok()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Write `value` at `path`, creating intermediate mappings (or arrays, for
    /// index segments) and overwriting whatever was there before.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        set_in(&mut self.data, &parse_path(path), value.into());
    }

    /// Remove and return the value at `path`.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        remove_in(&mut self.data, &parse_path(path))
    }

    /// Deep-merge a partial snapshot into the store.
    pub fn merge(&mut self, data: StoreData) {
        merge_into(&mut self.data, Value::Object(data.into_map()));
    }

    /// Deep-merge an arbitrary JSON mapping into the store.
    ///
    /// Non-mapping values are ignored: the store root is always a mapping.
    pub fn merge_value(&mut self, data: Value) {
        if !data.is_object() {
            warn!(kind = value_kind(&data), "ignoring merge of non-mapping value into store root");
            return;
        }
        merge_into(&mut self.data, data);
    }

    /// Independent deep copy of the whole store.
    pub fn dump(&self) -> Value {
        self.data.clone()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.as_object().map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> StoreData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn set_then_get() {
        let mut store = Store::new();
        store.set("a.b.c", 5);
        assert_eq!(store.get("a.b.c"), Some(&json!(5)));
        assert_eq!(store.get_as::<i64>("a.b.c"), Some(5));
    }

    #[test]
    fn fallback_on_missing_path() {
        let store = Store::new();
        assert_eq!(store.get("x.y"), None);
        assert_eq!(store.get_or("x.y", "fallback"), json!("fallback"));
    }

    #[test]
    fn explicit_null_is_not_missing() {
        let mut store = Store::new();
        store.set("page.cover", Value::Null);
        assert!(store.contains("page.cover"));
        assert_eq!(store.get_or("page.cover", "fallback"), Value::Null);
    }

    #[test]
    fn seeded_namespaces_are_visible() {
        let store = Store::from_data(data(json!({
            "meta": { "lang": "en" },
            "site": { "name": "Example" }
        })));
        assert_eq!(store.get("site.name"), Some(&json!("Example")));
        assert_eq!(store.get("page"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_keeps_untouched_keys() {
        let mut store = Store::from_data(data(json!({
            "page": { "title": "Y", "slug": "z" }
        })));
        store.merge(data(json!({ "page": { "title": "X" } })));
        assert_eq!(store.dump(), json!({ "page": { "title": "X", "slug": "z" } }));
    }

    #[test]
    fn merge_value_ignores_non_mappings() {
        let mut store = Store::new();
        store.set("a", 1);
        store.merge_value(json!([1, 2, 3]));
        store.merge_value(json!("text"));
        assert_eq!(store.dump(), json!({ "a": 1 }));

        store.merge_value(json!({ "b": { "c": true } }));
        assert_eq!(store.dump(), json!({ "a": 1, "b": { "c": true } }));
    }

    #[test]
    fn dump_is_independent() {
        let mut store = Store::new();
        store.set("page.items", json!([1, 2]));

        let mut snapshot = store.dump();
        snapshot["page"]["items"][0] = json!(100);
        assert_eq!(store.get("page.items[0]"), Some(&json!(1)));

        store.set("page.items[1]", 200);
        assert_eq!(snapshot["page"]["items"][1], json!(2));
    }

    #[test]
    fn empty_path_is_the_empty_key() {
        let mut store = Store::new();
        assert_eq!(store.get(""), None);
        store.set("", "root-level");
        assert_eq!(store.get(""), Some(&json!("root-level")));
        assert_eq!(store.dump(), json!({ "": "root-level" }));
    }

    #[test]
    fn store_serializes_as_its_data() {
        let mut store = Store::new();
        store.set("page.title", "Hello");
        let text = serde_json::to_string(&store).unwrap();
        assert_eq!(text, r#"{"page":{"title":"Hello"}}"#);
    }
}

// tests/store_paths.rs

use serde_json::json;

use pagequeue::{Store, StoreData};

fn data(value: serde_json::Value) -> StoreData {
    serde_json::from_value(value).unwrap()
}

#[test]
fn set_and_get_nested_path() {
    let mut store = Store::new();
    store.set("a.b.c", 5);
    assert_eq!(store.get("a.b.c"), Some(&json!(5)));
    assert_eq!(store.get_or("x.y", "fallback"), json!("fallback"));
}

#[test]
fn merge_is_deep_not_shallow() {
    let mut store = Store::from_data(data(json!({"page": {"title": "Y", "slug": "z"}})));
    store.merge(data(json!({"page": {"title": "X"}})));
    assert_eq!(store.dump(), json!({"page": {"title": "X", "slug": "z"}}));
}

#[test]
fn dump_copy_is_detached_from_store() {
    let mut store = Store::new();
    store.set("page.items", json!([{"id": 1}]));

    let mut copy = store.dump();
    copy["page"]["items"][0]["id"] = json!(99);
    copy["page"]["extra"] = json!(true);

    assert_eq!(store.get("page.items[0].id"), Some(&json!(1)));
    assert!(!store.contains("page.extra"));
}

#[test]
fn traversing_a_scalar_replaces_it() {
    let mut store = Store::new();
    store.set("page.title", "plain");
    store.set("page.title.main", "nested");
    assert_eq!(store.dump(), json!({"page": {"title": {"main": "nested"}}}));
}

#[test]
fn typed_reads() {
    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    let mut store = Store::new();
    store.set("page.items[0]", json!({"id": 7, "name": "seven"}));

    let item: Option<Item> = store.get_as("page.items[0]");
    assert_eq!(
        item,
        Some(Item {
            id: 7,
            name: "seven".to_string()
        })
    );
    assert_eq!(store.get_as::<Item>("page.items[1]"), None);
    assert_eq!(store.get_as::<u32>("page.items[0].name"), None);
}

#[test]
fn remove_then_get_falls_back() {
    let mut store = Store::from_data(data(json!({"page": {"draft": true}})));
    assert_eq!(store.remove("page.draft"), Some(json!(true)));
    assert_eq!(store.get_or("page.draft", false), json!(false));
    assert_eq!(store.dump(), json!({"page": {}}));
}

#[test]
fn merge_combines_arrays_index_wise_without_truncating() {
    let mut store = Store::from_data(data(json!({
        "page": { "items": [{ "a": 1 }, { "a": 2 }, { "a": 3 }] }
    })));

    store.merge(data(json!({ "page": { "items": [{ "b": 1 }] } })));
    assert_eq!(
        store.get("page.items"),
        Some(&json!([{ "a": 1, "b": 1 }, { "a": 2 }, { "a": 3 }]))
    );

    store.merge_value(json!({ "page": { "items": [null, { "a": 20 }, { "c": true }, "tail"] } }));
    assert_eq!(
        store.get("page.items"),
        Some(&json!([null, { "a": 20 }, { "a": 3, "c": true }, "tail"]))
    );
}

#[test]
fn merging_a_mapping_onto_an_array_keeps_its_elements() {
    let mut store = Store::new();
    store.set("page.tags", json!(["rust", "queue"]));

    store.merge_value(json!({ "page": { "tags": { "featured": "rust" } } }));

    assert_eq!(
        store.get("page.tags"),
        Some(&json!({ "0": "rust", "1": "queue", "featured": "rust" }))
    );
    assert_eq!(store.get("page.tags[1]"), Some(&json!("queue")));
}

#[test]
fn huge_index_is_stored_as_a_key() {
    let mut store = Store::new();
    store.set("page.items", json!(["first"]));
    store.set("page.items[18446744073709551615]", "last");

    assert_eq!(store.get("page.items.0"), Some(&json!("first")));
    assert_eq!(store.get("page.items[18446744073709551615]"), Some(&json!("last")));
}

// src/store/merge.rs

//! Deep read/write/merge helpers over `serde_json::Value` trees.
//!
//! Container coercion rules shared by `set_in` and `merge_into`:
//! - a scalar (or `null`) standing where a container is needed is replaced by
//!   a fresh one (array if the next segment is an index, mapping otherwise);
//! - an array addressed with a non-index key becomes a mapping keyed by its
//!   former indices (`"0"`, `"1"`, ...), so no element is lost;
//! - writing past the end of an array pads it with `null`, by at most
//!   [`MAX_ARRAY_PAD`] slots; an index further out turns the array into a
//!   mapping and is used as a key.

use serde_json::{Map, Value};

use super::path::Segment;

/// Largest number of `null` slots a single write may append to an array.
pub(crate) const MAX_ARRAY_PAD: usize = 10_000;

pub(crate) fn get_in<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |current, seg| match current {
        Value::Object(map) => map.get(&*seg.object_key()),
        Value::Array(items) => seg.array_index().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

fn get_mut_in<'a>(root: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    segments.iter().try_fold(root, |current, seg| match current {
        Value::Object(map) => map.get_mut(&*seg.object_key()),
        Value::Array(items) => seg.array_index().and_then(|idx| items.get_mut(idx)),
        _ => None,
    })
}

/// Write `value` at `segments`, creating intermediate containers.
pub(crate) fn set_in(root: &mut Value, segments: &[Segment], value: Value) {
    let mut current = root;

    for (i, seg) in segments.iter().enumerate() {
        let slot = slot_mut(current, seg);

        match segments.get(i + 1) {
            None => {
                *slot = value;
                return;
            }
            Some(next) => {
                if !is_container(slot) {
                    *slot = if next.is_index() {
                        Value::Array(Vec::new())
                    } else {
                        Value::Null
                    };
                }
                current = slot;
            }
        }
    }
}

/// Remove the value at `segments`.
///
/// Mapping entries are deleted; array elements are replaced by `null` so the
/// indices of later elements stay stable.
pub(crate) fn remove_in(root: &mut Value, segments: &[Segment]) -> Option<Value> {
    let (last, parents) = segments.split_last()?;
    match get_mut_in(root, parents)? {
        Value::Object(map) => map.remove(&*last.object_key()),
        Value::Array(items) => {
            let slot = items.get_mut(last.array_index()?)?;
            Some(std::mem::take(slot))
        }
        _ => None,
    }
}

/// Deep-merge `source` into `target`.
///
/// Mappings merge key by key, arrays merge index by index (the longer side
/// wins on length), and everything else overwrites.
pub(crate) fn merge_into(target: &mut Value, source: Value) {
    match source {
        Value::Object(entries) => {
            if target.is_array() {
                array_to_object(target);
            } else if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(dst) = target {
                for (key, value) in entries {
                    merge_into(dst.entry(key).or_insert(Value::Null), value);
                }
            }
        }
        Value::Array(items) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(dst) = target {
                for (idx, value) in items.into_iter().enumerate() {
                    match dst.get_mut(idx) {
                        Some(slot) => merge_into(slot, value),
                        None => dst.push(value),
                    }
                }
            }
        }
        scalar => *target = scalar,
    }
}

/// Child slot of `parent` for `seg`, coercing `parent` into a suitable
/// container first. Missing entries are created as `null`.
fn slot_mut<'a>(parent: &'a mut Value, seg: &Segment) -> &'a mut Value {
    let padded_len = match (&*parent, seg.array_index()) {
        (Value::Array(items), Some(idx)) => idx
            .checked_add(1)
            .filter(|&len| len <= items.len().saturating_add(MAX_ARRAY_PAD)),
        _ => None,
    };
    if let Some(len) = padded_len {
        if let Value::Array(items) = parent {
            if items.len() < len {
                items.resize(len, Value::Null);
            }
        }
        return &mut parent[len - 1];
    }

    if parent.is_array() {
        array_to_object(parent);
    } else if !parent.is_object() {
        *parent = Value::Null;
    }
    // Indexing a `null` with a key turns it into a mapping.
    &mut parent[&*seg.object_key()]
}

fn array_to_object(value: &mut Value) {
    if let Value::Array(items) = value {
        let map: Map<String, Value> = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(idx, item)| (idx.to_string(), item))
            .collect();
        *value = Value::Object(map);
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

// src/store/patch.rs
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// A node on the way down exists but is not an object.
    #[error("cannot descend into `{path}`: found {found}, expected object")]
    Conflict { path: String, found: &'static str },
}

pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Set `value` at `keys` inside `root`, creating empty objects for missing
/// intermediate keys. Siblings along the way are left alone. An empty key
/// sequence replaces the root.
///
/// Nothing is modified when an existing node on the path is not an object.
pub fn patch_at(root: &mut Value, keys: &[String], value: Value) -> Result<(), PatchError> {
    if keys.is_empty() {
        *root = value;
        return Ok(());
    }
    patch_object(root, keys, 0, value)
}

fn patch_object(node: &mut Value, keys: &[String], depth: usize, value: Value) -> Result<(), PatchError> {
    let Value::Object(map) = node else {
        return Err(PatchError::Conflict {
            path: keys[..depth].join("/"),
            found: type_name(node),
        });
    };

    let key = &keys[depth];
    if depth + 1 == keys.len() {
        map.insert(key.clone(), value);
        return Ok(());
    }

    let child = map
        .entry(key.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    patch_object(child, keys, depth + 1, value)
}

/// Walk `keys` down from `root`. `Ok(None)` when a key is missing,
/// `Err` when a node on the path is not an object.
pub fn lookup<'a>(root: &'a Value, keys: &[String]) -> Result<Option<&'a Value>, PatchError> {
    let mut node = root;
    for (depth, key) in keys.iter().enumerate() {
        let Value::Object(map) = node else {
            return Err(PatchError::Conflict {
                path: keys[..depth].join("/"),
                found: type_name(node),
            });
        };
        match map.get(key) {
            Some(child) => node = child,
            None => return Ok(None),
        }
    }
    Ok(Some(node))
}

// src/store/document.rs
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};
use thiserror::Error;

use super::key_path::KeyPath;
use super::patch::{self, PatchError};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{path}: earlier load failed, refusing to overwrite")]
    Refused { path: PathBuf },

    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error(transparent)]
    Conflict(#[from] PatchError),

    #[error("serialize: {0}")]
    Serialize(serde_json::Error),
}

/// Why `read_root` did not produce a document.
enum ReadMiss {
    Absent,
    Malformed(DocumentError),
    Failed(DocumentError),
}

/// One value at a fixed key path inside a JSON file.
///
/// The file may hold other data; `save` re-reads it and only replaces the
/// value at `key_path`. A failed load (anything other than a missing file or
/// missing key) latches `load_failed`, after which `save` is refused.
#[derive(Debug)]
pub struct KeyedJsonDocument {
    key_path: KeyPath,
    default: Value,
    path: PathBuf,
    value: Value,
    load_failed: bool,
}

impl KeyedJsonDocument {
    pub fn new(key_path: impl Into<KeyPath>, default: impl Into<Value>, path: impl AsRef<Path>) -> Self {
        let default = default.into();
        let mut doc = Self {
            key_path: key_path.into(),
            value: default.clone(),
            default,
            path: path.as_ref().to_path_buf(),
            load_failed: false,
        };
        doc.load();
        doc
    }

    /// Refresh `value` from disk. Returns false only when this call latched
    /// `load_failed`.
    pub fn load(&mut self) -> bool {
        let root = match read_root(&self.path) {
            Ok(root) => root,
            Err(ReadMiss::Absent) => {
                self.value = self.default.clone();
                return true;
            }
            Err(ReadMiss::Malformed(e)) | Err(ReadMiss::Failed(e)) => {
                return self.fail_load(&e.to_string());
            }
        };

        match patch::lookup(&root, self.key_path.keys()) {
            Ok(Some(found)) => {
                self.value = found.clone();
                true
            }
            Ok(None) => {
                self.value = self.default.clone();
                logd!("{}: key `{}` not found, using default", self.path.display(), self.key_path);
                true
            }
            Err(e) => self.fail_load(&e.to_string()),
        }
    }

    fn fail_load(&mut self, reason: &str) -> bool {
        self.value = self.default.clone();
        self.load_failed = true;
        loge!("Failed to load JSON file [keys={}]\n{reason}", self.key_path);
        false
    }

    /// Write `value` back into the file at `key_path`, keeping everything else
    /// that is on disk right now.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e @ DocumentError::Refused { .. }) => {
                loge!("Skipped saving because the data failed to load\n{e}");
                false
            }
            Err(e) => {
                loge!("Failed to save JSON file [keys={}]\n{e}", self.key_path);
                false
            }
        }
    }

    pub fn try_save(&self) -> Result<(), DocumentError> {
        if self.load_failed {
            return Err(DocumentError::Refused { path: self.path.clone() });
        }
        let root = self.read_base()?;
        let patched = self.patched(root)?;
        self.write(&patched)
    }

    /// Fresh copy of the on-disk document, or `{}` when there is nothing
    /// usable to start from.
    fn read_base(&self) -> Result<Value, DocumentError> {
        match read_root(&self.path) {
            Ok(root) => Ok(root),
            Err(ReadMiss::Absent) => {
                logf!("JSON file not found, creating it [keys={}] {}", self.key_path, self.path.display());
                Ok(Value::Object(Map::new()))
            }
            Err(ReadMiss::Malformed(e)) => {
                logf!("JSON file is broken, regenerating it [keys={}]\n{e}", self.key_path);
                Ok(Value::Object(Map::new()))
            }
            Err(ReadMiss::Failed(e)) => Err(e),
        }
    }

    fn patched(&self, mut root: Value) -> Result<Value, DocumentError> {
        patch::patch_at(&mut root, self.key_path.keys(), self.value.clone())?;
        Ok(root)
    }

    fn write(&self, root: &Value) -> Result<(), DocumentError> {
        let text = to_pretty_string(root).map_err(DocumentError::Serialize)?;
        fs::write(&self.path, text).map_err(|source| DocumentError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn get(&self) -> &Value {
        &self.value
    }

    /// Replace the value. Returns the result of `save` when `persist` is set,
    /// otherwise false ("not saved").
    pub fn set(&mut self, value: impl Into<Value>, persist: bool) -> bool {
        self.value = value.into();
        if persist {
            return self.save();
        }
        false
    }

    /// Add `step` to the value, treating anything that is not an integer as 0.
    pub fn increment(&mut self, persist: bool, step: i64) -> bool {
        let current = as_integer(&self.value).unwrap_or(0);
        self.set(current.saturating_add(step), persist)
    }

    pub fn key_path(&self) -> &KeyPath {
        &self.key_path
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Pretty-print JSON text or an object to stdout and return the text.
    /// Anything else (or text that does not parse) yields `None`.
    pub fn dumps(input: &Value) -> Option<String> {
        let parsed;
        let data = match input {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(v) => {
                    parsed = v;
                    &parsed
                }
                Err(e) => {
                    logd!("Failed to read JSON data: {e}");
                    return None;
                }
            },
            Value::Object(_) => input,
            other => {
                logd!("Failed to read JSON data: got {}", patch::type_name(other));
                return None;
            }
        };

        let text = to_pretty_string(data).ok()?;
        println!("{text}");
        Some(text)
    }
}

fn read_root(path: &Path) -> Result<Value, ReadMiss> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ReadMiss::Absent),
        Err(source) => {
            return Err(ReadMiss::Failed(DocumentError::Io { path: path.to_path_buf(), source }));
        }
    };
    serde_json::from_str(&text).map_err(|source| {
        ReadMiss::Malformed(DocumentError::Parse { path: path.to_path_buf(), source })
    })
}

/// Four-space indent, non-ASCII written as-is.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Integer reading of a JSON value: integers, truncated finite floats,
/// booleans, and decimal strings (surrounding whitespace, sign and `_`
/// digit grouping allowed). Numbers beyond the `i64` range clamp to its
/// bounds.
pub fn as_integer(v: &Value) -> Option<i64> {
    match v {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if let Some(u) = n.as_u64() {
                Some(i64::try_from(u).unwrap_or(i64::MAX))
            } else {
                // `as` truncates toward zero and saturates at the i64 bounds
                let f = n.as_f64()?;
                f.is_finite().then_some(f as i64)
            }
        }
        Value::String(s) => parse_int_str(s),
        _ => None,
    }
}

fn parse_int_str(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.as_bytes().first()? {
        b'-' => ("-", &s[1..]),
        b'+' => ("", &s[1..]),
        _ => ("", s),
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
    {
        return None;
    }
    let mut clean = s!(sign);
    clean.extend(digits.chars().filter(|c| *c != '_'));
    clean.parse().ok()
}

// src/settings.rs

//! Read-modify-write access to the JSON settings document.
//!
//! The document is kept as an untyped [`serde_json::Value`] on purpose:
//! the probe only owns three keys, and everything else in the file must
//! survive a rewrite untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{BuildError, Result};

/// A JSON settings document loaded from disk.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    doc: Value,
}

impl SettingsFile {
    /// Load the document from `path`. A missing file is an error: the
    /// settings artifact is expected to exist and be tracked.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path)?;
        let doc: Value = serde_json::from_str(&contents)?;

        if !doc.is_object() {
            return Err(BuildError::ConfigError(format!(
                "settings file {} is not a JSON object",
                path.display()
            )));
        }

        Ok(Self { path, doc })
    }

    /// Look up a key. Dots descend into nested objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut current = &self.doc;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Set a key to a value. Dots descend into nested objects, creating
    /// intermediate objects as needed; a non-object in the way is replaced.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let mut parts = key.split('.').peekable();
        let mut current = &mut self.doc;

        while let Some(part) = parts.next() {
            let map = current
                .as_object_mut()
                .expect("settings document root is always an object");

            if parts.peek().is_none() {
                map.insert(part.to_string(), value.into());
                return;
            }

            let entry = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry;
        }
    }

    /// Serialize the document back to the path it was loaded from,
    /// preserving every key that was not explicitly set.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "writing settings document");
        let contents = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

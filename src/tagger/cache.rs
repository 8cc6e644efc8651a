//! Flat JSON cache of raw annotation service responses.
//!
//! Entries are never invalidated: a present key means "already fetched".
//! The file is read once and rewritten in full, so only one process may use a
//! given cache file at a time.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Value};
use tracing::{info, warn};

use super::TagError;

#[derive(Debug, Clone)]
pub struct AnnotationCache {
    path: PathBuf,
    entries: IndexMap<String, Value>,
}

impl AnnotationCache {
    /// An empty cache that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    /// Read the cache file. A missing or unreadable file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Self::empty(path),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cache unreadable; starting empty");
                return Self::empty(path);
            }
        };
        match serde_json::from_str::<IndexMap<String, Value>>(&raw) {
            Ok(entries) => {
                info!(path = %path.display(), entries = entries.len(), "loaded annotation cache");
                Self { path, entries }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cache corrupt; starting empty");
                Self::empty(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, response: Value) {
        self.entries.insert(id.into(), response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite the cache file with every entry, indented by four spaces.
    pub fn save(&self) -> Result<(), TagError> {
        let io_err = |source| TagError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;
        fs::write(&self.path, buf).map_err(io_err)?;
        info!(path = %self.path.display(), entries = self.entries.len(), "saved annotation cache");
        Ok(())
    }
}

//! Saved-comic persistence
//!
//! Keeps exactly one record — the most recently displayed comic — as a small
//! JSON file under the user config dir. Saving replaces the whole file;
//! loading anything unreadable or incomplete is treated as "nothing saved".

use crate::fetch::ComicRecord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage seam for the controller. The app uses [`JsonStore`]; tests use an
/// in-memory double.
pub trait ComicStore {
    /// Persist the record, overwriting any previous one. Failures are not
    /// surfaced to the caller.
    fn save(&mut self, record: &ComicRecord);
    /// The previously saved record, or `None` if nothing usable is stored.
    fn load(&self) -> Option<ComicRecord>;
}

/// Get the config directory for the app.
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "comicview", "comicview")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File-backed store: one JSON object, keys `title`/`alt`/`img`.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new() -> Self {
        Self {
            path: config_dir().join("saved_comic.json"),
        }
    }

    /// Store backed by an explicit path, for tests.
    #[cfg(test)]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn write_record(&self, record: &ComicRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write to a sibling temp file and rename over the target, so a
        // reader never observes a half-written record.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComicStore for JsonStore {
    fn save(&mut self, record: &ComicRecord) {
        if let Err(e) = self.write_record(record) {
            log::warn!("could not save comic to {}: {}", self.path.display(), e);
        }
    }

    fn load(&self) -> Option<ComicRecord> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

/// In-memory store for controller tests. The backing cell is shared so a
/// test can keep a handle and inspect what the controller saved.
#[cfg(test)]
pub struct MemStore(pub std::sync::Arc<std::sync::Mutex<Option<ComicRecord>>>);

#[cfg(test)]
impl MemStore {
    pub fn new() -> (Self, std::sync::Arc<std::sync::Mutex<Option<ComicRecord>>>) {
        let cell = std::sync::Arc::new(std::sync::Mutex::new(None));
        (Self(cell.clone()), cell)
    }
}

#[cfg(test)]
impl ComicStore for MemStore {
    fn save(&mut self, record: &ComicRecord) {
        *self.0.lock().unwrap() = Some(record.clone());
    }

    fn load(&self) -> Option<ComicRecord> {
        self.0.lock().unwrap().clone()
    }
}

//! Persistent coordinate→area-code cache (C10): a TTL-bounded map
//! persisted to disk as JSON, modeled on the load/filter-expired/
//! write-then-rename pattern `FileCache` already uses, simplified to
//! this crate's single-small-map contract — the cached value here is a
//! six-digit area code string, not an arbitrary byte blob, so one JSON
//! file replaces `FileCache`'s per-entry-file-plus-metadata scheme.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{WipError, WipResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    area_code: String,
    inserted_at: u64,
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// TTL unit is whole seconds, matching every other duration already
/// used on the config surface (see `DESIGN.md` for the reasoning).
pub struct CoordinateCache {
    path: PathBuf,
    ttl_secs: u64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CoordinateCache {
    /// Loads `path` if present. A missing file starts empty; a file
    /// that fails to parse is a soft hint, not a hard error, and also
    /// starts empty. Entries already expired at load time are dropped.
    pub fn new<P: AsRef<Path>>(path: P, ttl_secs: u64) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut entries = Self::load(&path).unwrap_or_default();
        let loaded = entries.len();
        let now = now_secs();
        entries.retain(|_, e| now.saturating_sub(e.inserted_at) < ttl_secs);
        log::info!("loaded coordinate cache from {}: {} entries ({} expired)", path.display(), entries.len(), loaded - entries.len());
        Self { path, ttl_secs, entries: RwLock::new(entries) }
    }

    fn load(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(entries) => Some(entries),
            Err(e) => {
                log::warn!("coordinate cache at {} failed to parse, starting empty: {e}", path.display());
                None
            }
        }
    }

    /// Returns the area code if present and not expired. An expired
    /// entry is removed from the in-memory map as a side effect, but
    /// not flushed to disk until the next `set`.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = now_secs();
        let mut entries = self.entries.write().unwrap();
        match entries.get(key) {
            Some(entry) if now.saturating_sub(entry.inserted_at) < self.ttl_secs => Some(entry.area_code.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserts/overwrites `key` with the current timestamp and
    /// persists the whole map.
    pub fn set(&self, key: &str, area_code: &str) -> WipResult<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), CacheEntry { area_code: area_code.to_string(), inserted_at: now_secs() });
        log::debug!("cached {key} -> {area_code}");
        self.persist(&entries)
    }

    /// Empties the map and deletes the backing file.
    pub fn clear(&self) -> WipResult<()> {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        log::info!("cleared coordinate cache at {}", self.path.display());
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Writes to a sibling temp file and renames over `path`: a crash
    /// mid-save leaves either the previous file or the new one intact,
    /// never a half-written one.
    fn persist(&self, entries: &HashMap<String, CacheEntry>) -> WipResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let data = serde_json::to_string(entries)
            .map_err(|e| WipError::InvalidPacket(format!("failed to serialize coordinate cache: {e}")))?;
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

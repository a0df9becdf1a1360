//! Persistence: a key-value slot abstraction and the two slots the
//! register uses (rows and selected role).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{CarverError, CarverResult};
use crate::exporter::JsonExporter;
use crate::importer::from_stored_json;
use crate::models::AssetRecord;
use crate::sample::sample_records;
use crate::views::Role;

pub const ROWS_KEY: &str = "carver_rows_v1";
pub const ROLE_KEY: &str = "carver_role";

/// Durable string slots that survive process restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CarverResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> CarverResult<()>;
}

/// In-process store, mainly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CarverResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CarverResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> CarverResult<PathBuf> {
        let valid = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if key.is_empty() || !valid {
            return Err(CarverError::store(key, "key must be alphanumeric, '_' or '-'"));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CarverResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CarverError::io(e, path)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> CarverResult<()> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| CarverError::io(e, self.dir.clone()))?;
        // Write-then-rename keeps the slot whole
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value).map_err(|e| CarverError::io(e, tmp.clone()))?;
        std::fs::rename(&tmp, &path).map_err(|e| CarverError::io(e, path.clone()))?;
        Ok(())
    }
}

/// Everything the controller persists.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub rows: Vec<AssetRecord>,
    pub role: Role,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rows: sample_records(),
            role: Role::All,
        }
    }
}

/// Typed access to the register's two slots.
#[derive(Debug, Clone)]
pub struct StateStore<S: KeyValueStore> {
    inner: S,
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Read both slots. Missing or unreadable slots fall back to the sample
    /// register and the `All` role.
    pub fn load(&self) -> AppState {
        let rows = match self.inner.get(ROWS_KEY) {
            Ok(Some(text)) => match from_stored_json(&text) {
                Ok(rows) => rows,
                Err(e) => {
                    log::warn!("Stored register is unreadable, using sample data: {}", e);
                    sample_records()
                }
            },
            Ok(None) => {
                log::info!("No stored register, seeding sample data");
                sample_records()
            }
            Err(e) => {
                log::warn!("Failed to read stored register, using sample data: {}", e);
                sample_records()
            }
        };

        let role = match self.inner.get(ROLE_KEY) {
            Ok(Some(text)) => text.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring stored role: {}", e);
                Role::All
            }),
            Ok(None) => Role::All,
            Err(e) => {
                log::warn!("Failed to read stored role: {}", e);
                Role::All
            }
        };

        AppState { rows, role }
    }

    pub fn save(&mut self, state: &AppState) -> CarverResult<()> {
        self.save_rows(&state.rows)?;
        self.save_role(state.role)
    }

    pub fn save_rows(&mut self, rows: &[AssetRecord]) -> CarverResult<()> {
        let json = JsonExporter::export_rows(rows)?;
        self.inner.set(ROWS_KEY, &json)
    }

    pub fn save_role(&mut self, role: Role) -> CarverResult<()> {
        self.inner.set(ROLE_KEY, &role.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_store_loads_sample() {
        let store = StateStore::new(MemoryStore::new());
        let state = store.load();
        assert_eq!(state.rows.len(), 5);
        assert_eq!(state.role, Role::All);
    }

    #[test]
    fn test_save_then_load_preserves_ids_and_role() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = StateStore::new(MemoryStore::new());
        let mut state = AppState::default();
        state.rows.truncate(2);
        state.role = Role::Sec;
        store.save(&state)?;

        let loaded = store.load();
        assert_eq!(loaded, state);
        Ok(())
    }

    #[test]
    fn test_corrupt_slots_fall_back() -> Result<(), Box<dyn std::error::Error>> {
        let mut inner = MemoryStore::new();
        inner.set(ROWS_KEY, "{not json")?;
        inner.set(ROLE_KEY, "Admin")?;
        let state = StateStore::new(inner).load();
        assert_eq!(state.rows.len(), 5);
        assert_eq!(state.role, Role::All);
        Ok(())
    }

    #[test]
    fn test_file_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let mut store = FileStore::new(dir.path().join("state"));
        assert_eq!(store.get(ROLE_KEY)?, None);
        store.set(ROLE_KEY, "Comms")?;
        assert_eq!(store.get(ROLE_KEY)?.as_deref(), Some("Comms"));
        assert!(dir.path().join("state").join(ROLE_KEY).exists());
        Ok(())
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let mut store = FileStore::new("unused");
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_stored_empty_text_is_not_rewritten() -> Result<(), Box<dyn std::error::Error>> {
        let mut record = AssetRecord::new("asset-1".into(), String::new());
        record.asset_type = String::new();
        let mut store = StateStore::new(MemoryStore::new());
        store.save_rows(std::slice::from_ref(&record))?;

        let loaded = store.load();
        assert_eq!(loaded.rows, vec![record]);
        Ok(())
    }
}

//! Application controller.
//!
//! `AppController` owns the canonical register and is its only writer.
//! Every mutation is mirrored to the store; a failed write is logged and
//! otherwise ignored, since the in-memory state stays authoritative.

use std::path::Path;

use crate::errors::{CarverError, CarverResult};
use crate::exporter::{CsvExporter, JsonExporter};
use crate::heatmap::Heatmap;
use crate::importer::{import, ImportFormat};
use crate::models::{AssetRecord, EnrichedRecord, RecordField};
use crate::reporter::MarkdownReporter;
use crate::sample::sample_records;
use crate::scoring::enrich;
use crate::store::{AppState, KeyValueStore, StateStore};
use crate::validator::{new_id, normalize_text, parse_rating};
use crate::views::{build_table, Role, RowFilterPolicy, TableQuery, TableView};

pub struct AppController<S: KeyValueStore> {
    state: AppState,
    store: StateStore<S>,
    policy: RowFilterPolicy,
    reporter: MarkdownReporter,
}

impl<S: KeyValueStore> AppController<S> {
    /// Load state from `store` and take ownership of it.
    pub fn new(store: S, policy: RowFilterPolicy) -> Self {
        let store = StateStore::new(store);
        let state = store.load();
        log::debug!(
            "Loaded {} assets, role {}, row filter {:?}",
            state.rows.len(),
            state.role,
            policy
        );
        Self {
            state,
            store,
            policy,
            reporter: MarkdownReporter::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn rows(&self) -> &[AssetRecord] {
        &self.state.rows
    }

    pub fn role(&self) -> Role {
        self.state.role
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    fn persist_rows(&mut self) {
        if let Err(e) = self.store.save_rows(&self.state.rows) {
            log::warn!("Failed to persist register: {}", e);
        }
    }

    fn persist_role(&mut self) {
        if let Err(e) = self.store.save_role(self.state.role) {
            log::warn!("Failed to persist role: {}", e);
        }
    }

    fn find_mut(&mut self, id: &str) -> CarverResult<&mut AssetRecord> {
        self.state
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CarverError::UnknownRecord(id.to_string()))
    }

    /// Prepend a blank asset and return its id.
    pub fn add_row(&mut self) -> String {
        let id = new_id();
        self.state
            .rows
            .insert(0, AssetRecord::new(id.clone(), "New Asset".to_string()));
        log::info!("Added asset {}", id);
        self.persist_rows();
        id
    }

    /// Edit one field. Ratings are re-parsed and clamped; empty text takes
    /// the field default so exports re-import unchanged.
    pub fn update_field(&mut self, id: &str, field: RecordField, value: &str) -> CarverResult<()> {
        let record = self.find_mut(id)?;
        match field {
            RecordField::Text(text) => record.set_text(text, normalize_text(text, value)),
            RecordField::Rating(rating) => record.set_rating(rating, parse_rating(value)),
        }
        log::debug!("Updated {} on asset {}", field, id);
        self.persist_rows();
        Ok(())
    }

    pub fn remove_row(&mut self, id: &str) -> CarverResult<AssetRecord> {
        let pos = self
            .state
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CarverError::UnknownRecord(id.to_string()))?;
        let removed = self.state.rows.remove(pos);
        log::info!("Removed asset {} ({})", removed.name, id);
        self.persist_rows();
        Ok(removed)
    }

    pub fn reset_sample(&mut self) {
        self.replace_rows(sample_records());
    }

    pub fn replace_rows(&mut self, rows: Vec<AssetRecord>) {
        log::info!("Replacing register with {} assets", rows.len());
        self.state.rows = rows;
        self.persist_rows();
    }

    /// Replace the register with parsed `text`. On error nothing changes.
    pub fn import_text(&mut self, text: &str, format: ImportFormat) -> CarverResult<usize> {
        let rows = import(text, format)?;
        let count = rows.len();
        self.replace_rows(rows);
        Ok(count)
    }

    /// Read an uploaded file and import it, choosing the format by file type.
    pub async fn import_file(&mut self, path: &Path) -> CarverResult<usize> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CarverError::io(e, path.to_path_buf()))?;
        let format = ImportFormat::from_path(path);
        log::info!("Importing {} as {}", path.display(), format);
        self.import_text(&text, format)
    }

    pub fn set_role(&mut self, role: Role) {
        self.state.role = role;
        self.persist_role();
    }

    /// Rows with freshly derived metrics, in register order.
    pub fn enriched(&self) -> Vec<EnrichedRecord> {
        enrich(&self.state.rows)
    }

    pub fn table(&self, query: &TableQuery) -> TableView {
        build_table(self.enriched(), self.state.role, self.policy, query)
    }

    pub fn heatmap(&self) -> Heatmap {
        Heatmap::build(&self.enriched())
    }

    pub fn report(&self) -> String {
        self.reporter.build_report(&self.state.rows)
    }

    pub fn write_report(&self, path: &Path) -> CarverResult<()> {
        self.reporter.generate_report(&self.state.rows, path)
    }

    pub fn export_csv(&self) -> CarverResult<String> {
        CsvExporter::export(&self.state.rows)
    }

    pub fn export_json(&self) -> CarverResult<String> {
        JsonExporter::export(&self.state.rows)
    }
}

//! App library storage with file persistence.
//!
//! Each app is kept as one pretty-printed `<id>.json` file in the
//! persistence directory, and mirrored in memory for listing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{NodeEngineError, Result};
use crate::types::MiniApp;
use crate::validation::{app_from_value, serialize_app};

/// Metadata for an app (for listing).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ui_count: usize,
    pub node_count: usize,
}

impl From<&MiniApp> for AppSummary {
    fn from(app: &MiniApp) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            version: app.version.clone(),
            created_at: app.created_at,
            updated_at: app.updated_at,
            ui_count: app.ui_components.len(),
            node_count: app.nodes.len(),
        }
    }
}

/// Strip path separators and dots from an app id
///
/// Returns `None` when nothing usable is left.
pub fn safe_id(id: &str) -> Option<String> {
    let cleaned: String = id
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '.'))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// In-memory app library with optional file persistence.
///
/// # Example
///
/// ```ignore
/// use node_engine::AppStore;
///
/// let mut store = AppStore::with_persistence(data_dir.join("apps"));
/// store.load_from_disk()?;
/// for summary in store.list() {
///     println!("{} ({} nodes)", summary.name, summary.node_count);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AppStore {
    apps: HashMap<String, MiniApp>,
    persist_path: Option<PathBuf>,
}

impl AppStore {
    /// Create a new in-memory store without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that persists to the given directory.
    ///
    /// The directory will be created if it doesn't exist when saving.
    pub fn with_persistence(path: impl AsRef<Path>) -> Self {
        Self {
            apps: HashMap::new(),
            persist_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Load all apps from the persistence directory.
    ///
    /// Files that fail to parse or validate are skipped with a warning.
    /// Returns the number of apps loaded.
    pub fn load_from_disk(&mut self) -> Result<usize> {
        let Some(ref path) = self.persist_path else {
            return Ok(0);
        };

        if !path.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();

            if file_path.extension().is_some_and(|e| e == "json") {
                let content = std::fs::read_to_string(&file_path)?;
                let parsed = serde_json::from_str::<Value>(&content)
                    .map_err(NodeEngineError::from)
                    .and_then(app_from_value);
                match parsed {
                    Ok(app) => {
                        log::info!("Loaded app '{}' from {:?}", app.id, file_path);
                        self.apps.insert(app.id.clone(), app);
                        count += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse app from {:?}: {}", file_path, e);
                    }
                }
            }
        }
        Ok(count)
    }

    fn save_to_disk(&self, app: &MiniApp) -> Result<()> {
        let Some(ref path) = self.persist_path else {
            return Ok(());
        };

        std::fs::create_dir_all(path)?;
        let file_path = path.join(format!("{}.json", &app.id));
        std::fs::write(&file_path, serialize_app(app)?)?;
        log::debug!("Saved app '{}' to {:?}", app.id, file_path);
        Ok(())
    }

    fn delete_from_disk(&self, id: &str) -> Result<()> {
        let Some(ref path) = self.persist_path else {
            return Ok(());
        };

        let file_path = path.join(format!("{}.json", id));
        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            log::debug!("Deleted app '{}' from {:?}", id, file_path);
        }
        Ok(())
    }

    /// Summaries of every app, most recently updated first.
    pub fn list(&self) -> Vec<AppSummary> {
        let mut list: Vec<AppSummary> = self.apps.values().map(AppSummary::from).collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        list
    }

    pub fn get(&self, id: &str) -> Result<&MiniApp> {
        let id = safe_id(id).ok_or_else(|| NodeEngineError::InvalidId(id.to_string()))?;
        self.apps
            .get(&id)
            .ok_or_else(|| NodeEngineError::NotFound(format!("app '{}'", id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        safe_id(id).is_some_and(|id| self.apps.contains_key(&id))
    }

    /// Insert or update an app, stamping `updatedAt`.
    ///
    /// The id is sanitized first; the stored id is returned.
    pub fn save(&mut self, mut app: MiniApp) -> Result<String> {
        if app.name.is_empty() {
            return Err(NodeEngineError::invalid_format("missing 'name'"));
        }
        app.id = safe_id(&app.id).ok_or_else(|| NodeEngineError::InvalidId(app.id.clone()))?;
        app.touch();

        self.save_to_disk(&app)?;
        let id = app.id.clone();
        self.apps.insert(id.clone(), app);
        Ok(id)
    }

    /// Remove an app by id.
    pub fn delete(&mut self, id: &str) -> Result<MiniApp> {
        let id = safe_id(id).ok_or_else(|| NodeEngineError::InvalidId(id.to_string()))?;
        let app = self
            .apps
            .remove(&id)
            .ok_or_else(|| NodeEngineError::NotFound(format!("app '{}'", id)))?;
        self.delete_from_disk(&id)?;
        Ok(app)
    }

    /// Validate and store an app from JSON text, assigning an id if it has none.
    pub fn import(&mut self, json: &str) -> Result<String> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Some(obj) = value.as_object_mut() {
            let has_id = obj
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !has_id {
                obj.insert(
                    "id".to_string(),
                    Value::String(format!("app_{}", Utc::now().timestamp_millis())),
                );
            }
        }
        let app = app_from_value(value)?;
        let id = self.save(app)?;
        log::info!("Imported app '{}'", id);
        Ok(id)
    }

    /// Pretty JSON of a stored app
    pub fn export(&self, id: &str) -> Result<String> {
        serialize_app(self.get(id)?)
    }
}

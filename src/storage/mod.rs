use crate::error::{Result, SchemaBridgeError};
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub mod types;
pub use types::ModelRecord;

/// Lookup of the model identifier conversions should use
#[cfg_attr(test, mockall::automock)]
pub trait ModelRegistry: Send + Sync {
    /// Name of the active model, or `None` when no record is active
    fn active_model(&self) -> Result<Option<String>>;
}

/// SQLite-backed model registry
///
/// Each call opens its own connection and drops it before returning, on
/// success and error paths alike.
pub struct SqliteModelRegistry {
    db_path: PathBuf,
}

impl SqliteModelRegistry {
    /// Create a registry in the user's data directory
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "schemabridge", "schemabridge").ok_or_else(
            || SchemaBridgeError::Storage("Could not determine data directory".into()),
        )?;

        Self::new_with_path(proj_dirs.data_dir().join("models.db"))
    }

    /// Create a registry using the specified database path
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::storage::SqliteModelRegistry;
    ///
    /// let registry = SqliteModelRegistry::new_with_path("/tmp/schemabridge_doc_models.db").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;
        }

        let registry = Self { db_path };
        registry.init()?;
        Ok(registry)
    }

    /// Open the registry at an optional configured path
    pub fn open(db_path: Option<&str>) -> Result<Self> {
        match db_path {
            Some(path) => Self::new_with_path(path),
            None => Self::new(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()).into())
    }

    fn init(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS models (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model_name TEXT NOT NULL UNIQUE,
                is_active INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Register a model identifier; existing names are left untouched
    ///
    /// Returns `true` when a new record was inserted.
    pub fn add_model(&self, model_name: &str) -> Result<bool> {
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return Err(SchemaBridgeError::Storage("Model name cannot be empty".into()).into());
        }

        let conn = self.connect()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO models (model_name, is_active, created_at) VALUES (?, 0, ?)",
                params![model_name, Utc::now().to_rfc3339()],
            )
            .context("Failed to insert model")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Mark one model active and every other model inactive
    ///
    /// # Errors
    ///
    /// Returns a storage error if the model is not registered
    pub fn activate(&self, model_name: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM models WHERE model_name = ?",
                params![model_name],
                |_| Ok(true),
            )
            .optional()
            .context("Failed to query model")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?
            .unwrap_or(false);

        if !exists {
            return Err(
                SchemaBridgeError::Storage(format!("Unknown model: {}", model_name)).into(),
            );
        }

        tx.execute(
            "UPDATE models SET is_active = (model_name = ?)",
            params![model_name],
        )
        .context("Failed to update active model")
        .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Clear the active flag on every model
    pub fn deactivate_all(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute("UPDATE models SET is_active = 0", [])
            .context("Failed to clear active model")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Remove a model; returns `true` if a record was deleted
    pub fn remove_model(&self, model_name: &str) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM models WHERE model_name = ?", params![model_name])
            .context("Failed to delete model")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;
        Ok(removed > 0)
    }

    /// List all registered models in insertion order
    pub fn list_models(&self) -> Result<Vec<ModelRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, model_name, is_active, created_at FROM models ORDER BY id ASC")
            .context("Failed to prepare query")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let created_at: String = row.get(3)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                    created_at,
                ))
            })
            .context("Failed to query models")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;

        let mut models = Vec::new();
        for row in rows {
            let (id, model_name, is_active, created_at) = row
                .context("Failed to read model row")
                .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            models.push(ModelRecord {
                id,
                model_name,
                is_active,
                created_at,
            });
        }

        Ok(models)
    }
}

impl ModelRegistry for SqliteModelRegistry {
    fn active_model(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        let name = conn
            .query_row(
                "SELECT model_name FROM models WHERE is_active = 1 ORDER BY id ASC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Failed to query active model")
            .map_err(|e| SchemaBridgeError::Storage(e.to_string()))?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_registry() -> (SqliteModelRegistry, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let registry =
            SqliteModelRegistry::new_with_path(dir.path().join("models.db")).expect("registry");
        (registry, dir)
    }

    #[test]
    fn test_init_creates_table() {
        let (registry, _dir) = create_test_registry();
        let conn = Connection::open(registry.db_path()).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='models'",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_registry_has_no_active_model() {
        let (registry, _dir) = create_test_registry();
        assert_eq!(registry.active_model().unwrap(), None);
    }

    #[test]
    fn test_registered_but_inactive_model_is_not_active() {
        let (registry, _dir) = create_test_registry();
        assert!(registry.add_model("models/gemini-pro").unwrap());
        assert_eq!(registry.active_model().unwrap(), None);
    }

    #[test]
    fn test_add_model_is_idempotent() {
        let (registry, _dir) = create_test_registry();
        assert!(registry.add_model("a").unwrap());
        assert!(!registry.add_model("a").unwrap());
        assert_eq!(registry.list_models().unwrap().len(), 1);
        assert!(registry.add_model("  ").is_err());
    }

    #[test]
    fn test_activate_switches_exclusively() {
        let (registry, _dir) = create_test_registry();
        registry.add_model("a").unwrap();
        registry.add_model("b").unwrap();

        registry.activate("a").unwrap();
        assert_eq!(registry.active_model().unwrap().as_deref(), Some("a"));

        registry.activate("b").unwrap();
        assert_eq!(registry.active_model().unwrap().as_deref(), Some("b"));

        let active: Vec<String> = registry
            .list_models()
            .unwrap()
            .into_iter()
            .filter(|m| m.is_active)
            .map(|m| m.model_name)
            .collect();
        assert_eq!(active, vec!["b"]);
    }

    #[test]
    fn test_activate_unknown_model_fails() {
        let (registry, _dir) = create_test_registry();
        let err = registry.activate("missing").unwrap_err();
        assert!(err.to_string().contains("Unknown model"));
    }

    #[test]
    fn test_first_active_row_wins_when_several_are_flagged() {
        let (registry, _dir) = create_test_registry();
        registry.add_model("first").unwrap();
        registry.add_model("second").unwrap();
        let conn = Connection::open(registry.db_path()).unwrap();
        conn.execute("UPDATE models SET is_active = 1", []).unwrap();
        assert_eq!(registry.active_model().unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn test_deactivate_and_remove() {
        let (registry, _dir) = create_test_registry();
        registry.add_model("a").unwrap();
        registry.activate("a").unwrap();
        registry.deactivate_all().unwrap();
        assert_eq!(registry.active_model().unwrap(), None);

        assert!(registry.remove_model("a").unwrap());
        assert!(!registry.remove_model("a").unwrap());
        assert!(registry.list_models().unwrap().is_empty());
    }
}

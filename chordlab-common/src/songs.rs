//! Song store
//!
//! Persists caller-owned "analyzed song" documents in the `songs` table.
//! Records are schemaless JSON objects; only `id` and `dateAnalyzed` are
//! read by the store, every other field is passed through untouched.

use crate::{Error, Result};
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Record field holding the primary key
pub const ID_FIELD: &str = "id";

/// Record field used for ordering
pub const DATE_FIELD: &str = "dateAnalyzed";

/// CRUD access to song records plus bulk export
#[derive(Debug, Clone)]
pub struct SongStore {
    db: SqlitePool,
    backup_path: PathBuf,
}

impl SongStore {
    /// Create a store over an initialized pool
    ///
    /// `backup_path` is rewritten wholesale by [`SongStore::replace_all`].
    pub fn new(db: SqlitePool, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            backup_path: backup_path.into(),
        }
    }

    /// Location of the flat-file backup
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// All stored records, newest `dateAnalyzed` first
    ///
    /// Ordering is plain text comparison of whatever value was stored.
    pub async fn list_all(&self) -> Result<Vec<Value>> {
        let rows = sqlx::query("SELECT data FROM songs ORDER BY date_analyzed DESC")
            .fetch_all(&self.db)
            .await?;

        rows.iter()
            .map(|row| -> Result<Value> {
                Ok(serde_json::from_str::<Value>(row.get::<&str, _>("data"))?)
            })
            .collect()
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.db)
            .await?)
    }

    /// Look up a single record by id
    pub async fn get(&self, id: &str) -> Result<Option<Value>> {
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        data.map(|d| serde_json::from_str::<Value>(&d).map_err(Error::from))
            .transpose()
    }

    /// Insert or fully replace the record with the same id
    ///
    /// Fails with [`Error::Validation`] when the record is not an object or
    /// lacks a non-empty string `id`; the store is left untouched in that case.
    pub async fn upsert(&self, record: Value) -> Result<Value> {
        let id = validate_record(&record)?.to_string();
        let data = serde_json::to_string(&record)?;

        sqlx::query(
            r#"
            INSERT INTO songs (id, data, date_analyzed)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                date_analyzed = excluded.date_analyzed
            "#,
        )
        .bind(&id)
        .bind(&data)
        .bind(column_text(record.get(DATE_FIELD)))
        .execute(&self.db)
        .await?;

        debug!("Stored song {}", id);
        Ok(record)
    }

    /// Remove the record with `id`; unknown ids are a no-op
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Delete of unknown song {} ignored", id);
        } else {
            debug!("Deleted song {}", id);
        }
        Ok(())
    }

    /// Replace the whole store with `records` and rewrite the backup file
    ///
    /// Runs clear, inserts, then the file write as separate steps with no
    /// transaction around them: a failure part-way leaves whatever state was
    /// reached. Any failure is reported as [`Error::Export`].
    pub async fn replace_all(&self, records: &[Value]) -> Result<usize> {
        self.replace_rows(records).await.map_err(Error::export)?;
        self.write_backup(records).await.map_err(Error::export)?;

        info!(
            "Exported {} songs (backup: {})",
            records.len(),
            self.backup_path.display()
        );
        Ok(records.len())
    }

    async fn replace_rows(&self, records: &[Value]) -> Result<()> {
        let cleared = sqlx::query("DELETE FROM songs").execute(&self.db).await?;
        debug!("Cleared {} songs before export", cleared.rows_affected());

        for record in records {
            let data = serde_json::to_string(record)?;
            sqlx::query("INSERT OR REPLACE INTO songs (id, data, date_analyzed) VALUES (?, ?, ?)")
                .bind(column_text(record.get(ID_FIELD)))
                .bind(&data)
                .bind(column_text(record.get(DATE_FIELD)))
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }

    async fn write_backup(&self, records: &[Value]) -> Result<()> {
        if let Some(parent) = self.backup_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.backup_path, json).await.map_err(|e| {
            warn!("Failed to write backup {}: {}", self.backup_path.display(), e);
            Error::from(e)
        })
    }
}

/// Check the fields `upsert` requires and return the record id
pub fn validate_record(record: &Value) -> Result<&str> {
    let Some(fields) = record.as_object() else {
        return Err(Error::Validation("song record must be a JSON object".to_string()));
    };

    match fields.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.as_str()),
        Some(Value::String(_)) => Err(Error::Validation("song id must not be empty".to_string())),
        Some(Value::Null) | None => Err(Error::Validation("song id is required".to_string())),
        Some(_) => Err(Error::Validation("song id must be a string".to_string())),
    }
}

/// Text stored in an indexed column for a record field
///
/// Strings are stored as-is, absent and null become NULL, anything else is
/// stored as its JSON text.
fn column_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

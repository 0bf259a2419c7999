//! Embedded SQLite backend
//!
//! The database file is created on first connect and the schema is
//! idempotent, so a fresh checkout works with no provisioning step.
//! Structured fields (arguments, key terms) are stored as JSON text and
//! decoded on the way out; timestamps are RFC 3339 text, which sorts
//! correctly as strings.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;

use super::{title_or_filename, Note, Reading, ReadingStore};
use crate::analysis::ReadingAnalysis;
use crate::error::{AppError, Result};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to a SQLite URL (e.g. `sqlite:./marginalia.db` or
    /// `sqlite::memory:`), creating the file and schema if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        let store = SqliteStore { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                week_number INTEGER NOT NULL,
                title TEXT NOT NULL,
                filename TEXT NOT NULL,
                author TEXT,
                thesis TEXT NOT NULL,
                key_terms TEXT NOT NULL DEFAULT '[]',
                arguments TEXT NOT NULL DEFAULT '[]',
                historical_context TEXT NOT NULL,
                historiography TEXT NOT NULL,
                significance TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
                argument_index INTEGER NOT NULL,
                note_text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(reading_id, argument_index)
            );

            CREATE INDEX IF NOT EXISTS idx_readings_week ON readings(week_number);
            CREATE INDEX IF NOT EXISTS idx_notes_reading ON notes(reading_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn read_row(row: &SqliteRow) -> Result<Reading> {
        let key_terms: String = row.try_get("key_terms")?;
        let arguments: String = row.try_get("arguments")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Reading {
            id: row.try_get("id")?,
            week_number: row.try_get("week_number")?,
            title: row.try_get("title")?,
            filename: row.try_get("filename")?,
            author: row.try_get("author")?,
            thesis: row.try_get("thesis")?,
            key_terms: serde_json::from_str(&key_terms)?,
            arguments: serde_json::from_str(&arguments)?,
            historical_context: row.try_get("historical_context")?,
            historiography: row.try_get("historiography")?,
            significance: row.try_get("significance")?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| AppError::Internal(format!("Bad stored timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}

const READING_COLUMNS: &str = "id, week_number, title, filename, author, thesis, key_terms, \
     arguments, historical_context, historiography, significance, created_at";

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn create_reading(
        &self,
        week_number: i64,
        filename: &str,
        analysis: &ReadingAnalysis,
    ) -> Result<i64> {
        let key_terms = serde_json::to_string(&analysis.key_terms)?;
        let arguments = serde_json::to_string(&analysis.arguments)?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO readings (
                week_number, title, filename, author, thesis, key_terms,
                arguments, historical_context, historiography, significance, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(week_number)
        .bind(title_or_filename(analysis, filename))
        .bind(filename)
        .bind(&analysis.author)
        .bind(&analysis.thesis)
        .bind(&key_terms)
        .bind(&arguments)
        .bind(&analysis.historical_context)
        .bind(&analysis.historiography)
        .bind(&analysis.significance)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_readings(&self, week_number: Option<i64>) -> Result<Vec<Reading>> {
        let rows = match week_number {
            Some(week) => {
                sqlx::query(&format!(
                    "SELECT {READING_COLUMNS} FROM readings \
                     WHERE week_number = ? \
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(week)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {READING_COLUMNS} FROM readings \
                     ORDER BY week_number ASC, created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(Self::read_row).collect()
    }

    async fn get_reading(&self, id: i64) -> Result<Option<Reading>> {
        let row = sqlx::query(&format!(
            "SELECT {READING_COLUMNS} FROM readings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::read_row).transpose()
    }

    async fn delete_reading(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM readings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_note(
        &self,
        reading_id: i64,
        argument_index: i64,
        note_text: &str,
    ) -> Result<Note> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO notes (reading_id, argument_index, note_text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(reading_id, argument_index) DO UPDATE SET
                note_text = excluded.note_text,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(reading_id)
        .bind(argument_index)
        .bind(note_text)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Note {
            reading_id,
            argument_index,
            note_text: note_text.to_string(),
        })
    }

    async fn notes_for_reading(&self, reading_id: i64) -> Result<BTreeMap<i64, String>> {
        let rows = sqlx::query(
            "SELECT argument_index, note_text FROM notes WHERE reading_id = ?",
        )
        .bind(reading_id)
        .fetch_all(&self.pool)
        .await?;

        let mut notes = BTreeMap::new();
        for row in &rows {
            notes.insert(row.try_get("argument_index")?, row.try_get("note_text")?);
        }
        Ok(notes)
    }

    async fn delete_note(&self, reading_id: i64, argument_index: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM notes WHERE reading_id = ? AND argument_index = ?")
                .bind(reading_id)
                .bind(argument_index)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

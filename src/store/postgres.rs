//! Hosted Postgres backend
//!
//! For a hosted relational service (e.g. a managed Postgres with the schema
//! from `migrations/postgres.sql` already applied). Unlike the SQLite
//! backend, structured fields live in native JSONB columns and timestamps in
//! TIMESTAMPTZ, so nothing is string-encoded here beyond what sqlx does
//! itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use super::{title_or_filename, Note, Reading, ReadingStore};
use crate::analysis::{Argument, KeyTerm, ReadingAnalysis};
use crate::error::Result;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to a hosted Postgres URL. The schema is assumed to exist.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(PostgresStore { pool })
    }

    fn read_row(row: &PgRow) -> Result<Reading> {
        let key_terms: Json<Vec<KeyTerm>> = row.try_get("key_terms")?;
        let arguments: Json<Vec<Argument>> = row.try_get("arguments")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(Reading {
            id: row.try_get("id")?,
            week_number: row.try_get("week_number")?,
            title: row.try_get("title")?,
            filename: row.try_get("filename")?,
            author: row.try_get("author")?,
            thesis: row.try_get("thesis")?,
            key_terms: key_terms.0,
            arguments: arguments.0,
            historical_context: row.try_get("historical_context")?,
            historiography: row.try_get("historiography")?,
            significance: row.try_get("significance")?,
            created_at,
        })
    }
}

const READING_COLUMNS: &str = "id, week_number, title, filename, author, thesis, key_terms, \
     arguments, historical_context, historiography, significance, created_at";

#[async_trait]
impl ReadingStore for PostgresStore {
    async fn create_reading(
        &self,
        week_number: i64,
        filename: &str,
        analysis: &ReadingAnalysis,
    ) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO readings (
                week_number, title, filename, author, thesis, key_terms,
                arguments, historical_context, historiography, significance, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(week_number)
        .bind(title_or_filename(analysis, filename))
        .bind(filename)
        .bind(&analysis.author)
        .bind(&analysis.thesis)
        .bind(Json(&analysis.key_terms))
        .bind(Json(&analysis.arguments))
        .bind(&analysis.historical_context)
        .bind(&analysis.historiography)
        .bind(&analysis.significance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn list_readings(&self, week_number: Option<i64>) -> Result<Vec<Reading>> {
        let rows = match week_number {
            Some(week) => {
                sqlx::query(&format!(
                    "SELECT {READING_COLUMNS} FROM readings \
                     WHERE week_number = $1 \
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
            "SELECT {READING_COLUMNS} FROM readings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::read_row).transpose()
    }

    async fn delete_reading(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM readings WHERE id = $1")
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
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO notes (reading_id, argument_index, note_text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (reading_id, argument_index) DO UPDATE SET
                note_text = EXCLUDED.note_text,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(reading_id)
        .bind(argument_index)
        .bind(note_text)
        .bind(now)
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
            "SELECT argument_index, note_text FROM notes WHERE reading_id = $1",
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
            sqlx::query("DELETE FROM notes WHERE reading_id = $1 AND argument_index = $2")
                .bind(reading_id)
                .bind(argument_index)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Reading persistence
//!
//! Two interchangeable backends behind one capability trait: an embedded
//! SQLite file (auto-created, structured fields stored as JSON text) and a
//! hosted Postgres service (schema pre-provisioned, structured fields stored
//! as native JSONB). Encoding and decoding happen inside each backend;
//! callers only ever see the structured [`Reading`] model.

mod postgres;
mod sqlite;
mod types;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use types::{Note, Reading};

use crate::analysis::ReadingAnalysis;
use crate::error::Result;

/// Storage operations shared by both backends
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist a newly analyzed reading, returning its id.
    ///
    /// The stored title falls back to the filename when the analysis has none.
    async fn create_reading(
        &self,
        week_number: i64,
        filename: &str,
        analysis: &ReadingAnalysis,
    ) -> Result<i64>;

    /// List readings, newest-first within a week.
    ///
    /// With no filter, ordered by week ascending then newest-first.
    async fn list_readings(&self, week_number: Option<i64>) -> Result<Vec<Reading>>;

    /// Fetch one reading; `None` if absent.
    async fn get_reading(&self, id: i64) -> Result<Option<Reading>>;

    /// Delete a reading and (by cascade) its notes. `false` if nothing matched.
    async fn delete_reading(&self, id: i64) -> Result<bool>;

    /// Insert or update the note for `(reading_id, argument_index)`.
    ///
    /// Atomic on the unique pair; concurrent upserts resolve in the store.
    async fn upsert_note(
        &self,
        reading_id: i64,
        argument_index: i64,
        note_text: &str,
    ) -> Result<Note>;

    /// All notes for a reading, as argument index -> text.
    async fn notes_for_reading(&self, reading_id: i64) -> Result<BTreeMap<i64, String>>;

    /// Delete one note. `false` if nothing matched.
    async fn delete_note(&self, reading_id: i64, argument_index: i64) -> Result<bool>;
}

/// Title stored for a reading: the analysis title, or the filename when the
/// model produced none.
pub(crate) fn title_or_filename<'a>(analysis: &'a ReadingAnalysis, filename: &'a str) -> &'a str {
    if analysis.title.trim().is_empty() {
        filename
    } else {
        &analysis.title
    }
}

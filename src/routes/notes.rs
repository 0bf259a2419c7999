//! Argument-note routes
//!
//! Notes hang off a reading by argument index. The PUT endpoint doubles as a
//! delete: submitting blank text removes any existing note instead of
//! storing whitespace.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NoteRequest {
    pub note_text: String,
}

#[derive(Serialize)]
pub struct NotesResponse {
    pub reading_id: i64,
    pub notes: BTreeMap<i64, String>,
}

#[derive(Serialize)]
pub struct NoteUpdateResponse {
    pub reading_id: i64,
    pub argument_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Serialize)]
pub struct DeletedNote {
    pub status: &'static str,
    pub reading_id: i64,
    pub argument_index: i64,
}

async fn ensure_reading_exists(state: &AppState, reading_id: i64) -> Result<()> {
    state
        .store()
        .get_reading(reading_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reading not found".to_string()))?;
    Ok(())
}

/// All notes for a reading, keyed by argument index
pub async fn list(
    State(state): State<AppState>,
    Path(reading_id): Path<i64>,
) -> Result<Json<NotesResponse>> {
    ensure_reading_exists(&state, reading_id).await?;
    let notes = state.store().notes_for_reading(reading_id).await?;
    Ok(Json(NotesResponse { reading_id, notes }))
}

/// Save or update the note for one argument.
///
/// Blank text is a delete request; deleting a note that never existed is a
/// silent no-op, not a 404.
pub async fn update(
    State(state): State<AppState>,
    Path((reading_id, argument_index)): Path<(i64, i64)>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<NoteUpdateResponse>> {
    ensure_reading_exists(&state, reading_id).await?;

    if request.note_text.trim().is_empty() {
        state.store().delete_note(reading_id, argument_index).await?;
        return Ok(Json(NoteUpdateResponse {
            reading_id,
            argument_index,
            note_text: None,
            deleted: Some(true),
        }));
    }

    let note = state
        .store()
        .upsert_note(reading_id, argument_index, &request.note_text)
        .await?;
    Ok(Json(NoteUpdateResponse {
        reading_id,
        argument_index,
        note_text: Some(note.note_text),
        deleted: None,
    }))
}

/// Delete the note for one argument
pub async fn delete(
    State(state): State<AppState>,
    Path((reading_id, argument_index)): Path<(i64, i64)>,
) -> Result<Json<DeletedNote>> {
    if !state.store().delete_note(reading_id, argument_index).await? {
        return Err(AppError::NotFound("Note not found".to_string()));
    }
    Ok(Json(DeletedNote {
        status: "deleted",
        reading_id,
        argument_index,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::routes::testutil::{sample_analysis, test_server, test_state};
    use crate::store::ReadingStore;

    #[tokio::test]
    async fn put_creates_then_updates_a_note() {
        let (state, store) = test_state().await;
        let id = store
            .create_reading(1, "a.pdf", &sample_analysis())
            .await
            .unwrap();
        let server = test_server(state);

        let response = server
            .put(&format!("/api/readings/{}/notes/0", id))
            .json(&json!({"note_text": "compare with Thompson"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["note_text"], "compare with Thompson");

        server
            .put(&format!("/api/readings/{}/notes/0", id))
            .json(&json!({"note_text": "actually closer to Hobsbawm"}))
            .await
            .assert_status_ok();

        let notes = store.notes_for_reading(id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes.get(&0).map(String::as_str),
            Some("actually closer to Hobsbawm")
        );
    }

    #[tokio::test]
    async fn put_blank_text_deletes_and_never_creates() {
        let (state, store) = test_state().await;
        let id = store
            .create_reading(1, "a.pdf", &sample_analysis())
            .await
            .unwrap();
        store.upsert_note(id, 2, "stale note").await.unwrap();
        let server = test_server(state);

        let response = server
            .put(&format!("/api/readings/{}/notes/2", id))
            .json(&json!({"note_text": "   \n  "}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["deleted"], true);
        assert!(store.notes_for_reading(id).await.unwrap().is_empty());

        // Blank PUT against a nonexistent note: still 200, still nothing stored.
        let response = server
            .put(&format!("/api/readings/{}/notes/5", id))
            .json(&json!({"note_text": ""}))
            .await;
        response.assert_status_ok();
        assert!(store.notes_for_reading(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn note_routes_404_for_missing_reading() {
        let (state, _) = test_state().await;
        let server = test_server(state);

        server
            .get("/api/readings/99/notes")
            .await
            .assert_status_not_found();
        server
            .put("/api/readings/99/notes/0")
            .json(&json!({"note_text": "lost"}))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn list_returns_index_to_text_mapping() {
        let (state, store) = test_state().await;
        let id = store
            .create_reading(1, "a.pdf", &sample_analysis())
            .await
            .unwrap();
        store.upsert_note(id, 0, "first").await.unwrap();
        store.upsert_note(id, 3, "fourth").await.unwrap();
        let server = test_server(state);

        let response = server.get(&format!("/api/readings/{}/notes", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["reading_id"], id);
        assert_eq!(body["notes"]["0"], "first");
        assert_eq!(body["notes"]["3"], "fourth");
    }

    #[tokio::test]
    async fn delete_note_404_when_nothing_matched() {
        let (state, store) = test_state().await;
        let id = store
            .create_reading(1, "a.pdf", &sample_analysis())
            .await
            .unwrap();
        let server = test_server(state);

        server
            .delete(&format!("/api/readings/{}/notes/0", id))
            .await
            .assert_status_not_found();

        store.upsert_note(id, 0, "note").await.unwrap();
        let response = server.delete(&format!("/api/readings/{}/notes/0", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "deleted");
    }
}

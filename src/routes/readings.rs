//! Reading upload and retrieval routes

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::ReadingAnalysis;
use crate::error::{AppError, Result};
use crate::pdf;
use crate::state::AppState;
use crate::store::Reading;

/// Valid week numbers for the course. Purely a bucket key, no calendar
/// relationship is enforced.
pub const MIN_WEEK: i64 = 1;
pub const MAX_WEEK: i64 = 13;

fn validate_week(week: i64) -> Result<()> {
    if !(MIN_WEEK..=MAX_WEEK).contains(&week) {
        return Err(AppError::BadRequest(format!(
            "Week must be between {} and {}",
            MIN_WEEK, MAX_WEEK
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct UploadParams {
    pub week: i64,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub week: Option<i64>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub id: i64,
    pub week: i64,
    pub filename: String,
    pub analysis: ReadingAnalysis,
}

#[derive(Serialize)]
pub struct ReadingList {
    pub readings: Vec<Reading>,
}

#[derive(Serialize)]
pub struct DeletedReading {
    pub status: &'static str,
    pub id: i64,
}

/// Upload a PDF reading, analyze it, and persist the result.
///
/// Week validation happens before the multipart body is touched, so an
/// out-of-range week never costs an extraction or a model call.
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    validate_week(params.week)?;

    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            file = Some((filename, data));
        }
    }
    let (filename, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field in upload".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::BadRequest(
            "Only PDF files are accepted".to_string(),
        ));
    }

    let text = pdf::extract_text(&data)
        .map_err(|e| AppError::BadRequest(format!("Failed to extract text from PDF: {}", e)))?;
    if text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Could not extract any text from the PDF".to_string(),
        ));
    }

    let analysis = state
        .analyzer()
        .analyze(&text)
        .await
        .map_err(|e| AppError::Analysis(format!("Failed to analyze reading: {}", e)))?;

    let id = state
        .store()
        .create_reading(params.week, &filename, &analysis)
        .await?;

    tracing::info!(id, week = params.week, %filename, "Stored analyzed reading");

    Ok(Json(UploadResponse {
        id,
        week: params.week,
        filename,
        analysis,
    }))
}

/// List readings, optionally filtered by week
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ReadingList>> {
    if let Some(week) = params.week {
        validate_week(week)?;
    }
    let readings = state.store().list_readings(params.week).await?;
    Ok(Json(ReadingList { readings }))
}

/// Fetch one reading by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Reading>> {
    let reading = state
        .store()
        .get_reading(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reading not found".to_string()))?;
    Ok(Json(reading))
}

/// Delete a reading (and its notes, by cascade)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedReading>> {
    if !state.store().delete_reading(id).await? {
        return Err(AppError::NotFound("Reading not found".to_string()));
    }
    Ok(Json(DeletedReading {
        status: "deleted",
        id,
    }))
}

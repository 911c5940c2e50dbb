use axum::extract::{Multipart, State};
use axum::Json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::server::AppState;
use super::types::{ApiError, YoutubeRequest};
use crate::document::{extract, SupportedFormat};
use crate::quiz::types::QuizOutput;
use crate::youtube;

/// `POST /generate-quiz`: multipart upload, field `file`.
///
/// Bad extension is a 400; conversion and PDF-read failures are 500s with
/// the cause embedded in `detail`; blank extracted text and agent-side
/// failures come back as 200 bodies carrying `{"error": ...}`.
pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<QuizOutput>, ApiError> {
    let (filename, data) = read_upload(&mut multipart).await?;

    let format = SupportedFormat::from_filename(&filename).ok_or_else(|| {
        ApiError::BadRequest("Only PDF and PowerPoint files (PPT/PPTX) are supported.".to_string())
    })?;

    info!("Processing uploaded file: {}", filename);

    let content = {
        // Request-scoped temp dir, removed on drop on every exit path.
        let temp_dir = tempfile::tempdir()
            .map_err(|e| ApiError::Internal(format!("Error processing file: {}", e)))?;
        let upload_path = temp_dir.path().join(&filename);
        tokio::fs::write(&upload_path, &data)
            .await
            .map_err(|e| ApiError::Internal(format!("Error processing file: {}", e)))?;

        let pdf_path: PathBuf = if format.needs_conversion() {
            info!("Converting {} to PDF", filename);
            state
                .converter
                .convert_to_pdf(&upload_path)
                .await
                .map_err(|e| {
                    error!("Document conversion error: {}", e);
                    ApiError::Internal(format!("Error converting PowerPoint to PDF: {}", e))
                })?
        } else {
            upload_path
        };

        let pdf_bytes = tokio::fs::read(&pdf_path)
            .await
            .map_err(|e| ApiError::Internal(format!("Error reading PDF content: {}", e)))?;

        extract::extract_text(&pdf_bytes).map_err(|e| {
            error!("PDF reading error: {}", e);
            ApiError::Internal(format!("Error reading PDF content: {}", e))
        })?
    };

    if content.trim().is_empty() {
        warn!("No readable content found in {}", filename);
        return Ok(Json(QuizOutput::error(
            "No readable content found in the file. Please upload a valid document.",
        )));
    }

    info!("Extracted {} characters from {}", content.len(), filename);
    Ok(Json(state.quiz.generate(&content).await))
}

/// `POST /generate-quiz-from-youtube`: JSON body `{"url": ...}`.
pub async fn generate_quiz_from_youtube(
    State(state): State<Arc<AppState>>,
    Json(body): Json<YoutubeRequest>,
) -> Result<Json<QuizOutput>, ApiError> {
    let video_id = youtube::resolve_video_id(&body.url)
        .ok_or_else(|| ApiError::BadRequest("Invalid YouTube URL".to_string()))?;

    info!("Processing YouTube video: {}", video_id);

    let transcript = youtube::transcript::fetch_transcript(&video_id)
        .await
        .map_err(|e| {
            error!("Error processing YouTube video: {}", e);
            ApiError::Internal(format!("Error processing YouTube video: {}", e))
        })?;

    if transcript.trim().is_empty() {
        return Ok(Json(QuizOutput::error(
            "No transcript available for this video",
        )));
    }

    info!("Transcript fetched: {} characters", transcript.len());
    Ok(Json(state.quiz.generate(&transcript).await))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Internal(format!("Error processing file: {}", e)))?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(ApiError::BadRequest(
        "Missing multipart field `file`".to_string(),
    ))
}

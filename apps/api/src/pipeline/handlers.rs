use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::export::{to_table, EXPORT_FILENAME};
use crate::models::document::Upload;
use crate::pipeline::BatchOutcome;
use crate::state::AppState;

/// Multipart field carrying resume files. Repeat it once per file.
const FILES_FIELD: &str = "files";

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchOutcome>, AppError> {
    let uploads = read_uploads(multipart).await?;
    let outcome = state.pipeline.run(uploads).await;
    Ok(Json(outcome))
}

/// POST /api/v1/resumes/export
/// Same input as parse; returns the records as a CSV download.
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let uploads = read_uploads(multipart).await?;
    let outcome = state.pipeline.run(uploads).await;
    let table = to_table(&outcome.records)?;
    info!(
        run_id = %outcome.run_id,
        rows = outcome.records.len(),
        "Exported batch as CSV"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        table,
    )
        .into_response())
}

/// Collects every `files` part. Other fields are ignored.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<Upload>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("document").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;

        let mut upload = Upload::new(filename, bytes);
        if let Some(ct) = content_type {
            upload = upload.with_content_type(ct);
        }
        uploads.push(upload);
    }

    if uploads.is_empty() {
        return Err(AppError::Validation(format!(
            "No files uploaded; send one or more '{FILES_FIELD}' parts"
        )));
    }
    Ok(uploads)
}

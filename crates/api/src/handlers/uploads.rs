//! Evidence file upload.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use prisma_core::validation::{sanitize_filename, validate_upload_extension};
use prisma_db::models::response::FileReference;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field holding the file.
pub const UPLOAD_FIELD: &str = "arquivo";

/// Public path prefix the upload directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// POST /api/upload
///
/// Stores the `arquivo` field as `{uuid}_{sanitized name}` in the upload
/// directory and returns the reference to attach to a response.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<FileReference>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (original_name, data) = file_data
        .ok_or_else(|| AppError::BadRequest("Nenhum arquivo enviado".into()))?;
    if original_name.trim().is_empty() {
        return Err(AppError::BadRequest("Nenhum arquivo selecionado".into()));
    }
    validate_upload_extension(&original_name)?;

    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(&original_name));
    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(upload_dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        file = %stored_name,
        size_bytes = data.len(),
        "Evidence file uploaded"
    );

    let reference = FileReference {
        name: original_name,
        url: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
        filename: stored_name,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: reference })))
}

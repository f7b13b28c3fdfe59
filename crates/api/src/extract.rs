//! Request extractors with project-wide rejection handling.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections become `400 BAD_REQUEST` in the
/// standard error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

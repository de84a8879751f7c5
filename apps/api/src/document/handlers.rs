use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::document::upload::{extract_upload, read_upload};
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub text: String,
}

/// POST /api/v1/documents/extract
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    let text = extract_upload(&upload).await?;
    Ok(Json(ExtractResponse {
        file_name: upload.file_name,
        text,
    }))
}

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::Value;

use crate::analysis::{analyze_kind, SchemaKind};
use crate::document::upload::{extract_upload, read_upload};
use crate::errors::AppError;
use crate::schemas::Coercion;
use crate::state::AppState;

/// POST /api/v1/analyze/:schema
///
/// Extracts the uploaded document and asks the model to fill `schema`.
/// Always answers with the tagged coercion outcome when the model replied.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(schema): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Coercion<Value>>, AppError> {
    let kind: SchemaKind = schema.parse().map_err(AppError::NotFound)?;
    let upload = read_upload(&mut multipart).await?;
    let text = extract_upload(&upload).await?;

    let outcome = analyze_kind(kind, state.llm.as_ref(), &text, upload.context.as_deref()).await?;
    Ok(Json(outcome))
}

use std::io::Write;
use std::path::Path;

use axum::extract::multipart::{Multipart, MultipartError};

use crate::document::{extension_of, extract_text, DocumentKind, ExtractError};
use crate::errors::AppError;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A file received over multipart, plus the optional `context` text field.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub context: Option<String>,
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

/// Reads the `file` field (required) and `context` field (optional).
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut context = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("context") => {
                context = Some(field.text().await.map_err(bad_multipart)?);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if file_name.is_empty() {
        return Err(AppError::Validation(
            "The 'file' field must carry a file name".to_string(),
        ));
    }

    Ok(Upload {
        file_name,
        bytes,
        context,
    })
}

/// Extracts text from an upload on the blocking pool.
pub async fn extract_upload(upload: &Upload) -> Result<String, AppError> {
    let file_name = upload.file_name.clone();
    let bytes = upload.bytes.clone();
    let text = tokio::task::spawn_blocking(move || extract_to_temp(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(text)
}

/// Writes the bytes to a temp file carrying the upload's extension, then runs
/// the regular path-based extractor on it.
fn extract_to_temp(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let extension = extension_of(Path::new(file_name));
    if DocumentKind::from_extension(&extension).is_none() {
        return Err(ExtractError::UnsupportedFileType(extension));
    }

    let mut file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&extension)
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    extract_text(file.path())
}

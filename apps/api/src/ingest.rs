//! Resume ingestion: turns an uploaded PDF into plain text.
//!
//! PDF parsing is CPU-bound and synchronous, so it runs inside
//! `tokio::task::spawn_blocking`.

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Rejects uploads that are not a `.pdf` or exceed `max_bytes`.
pub fn validate_upload(file_name: &str, size: usize, max_bytes: usize) -> Result<(), AppError> {
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(format!(
            "Only PDF files are supported, got '{file_name}'"
        )));
    }
    if size == 0 {
        return Err(AppError::Validation(format!("'{file_name}' is empty")));
    }
    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "'{file_name}' is {size} bytes; the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Extracts the text layer of a PDF. A document with no text layer is unprocessable.
pub async fn extract_pdf_text(file_name: String, data: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
    .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF '{file_name}': {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "Could not extract text from '{file_name}'"
        )));
    }

    info!("Extracted {} characters from {file_name}", text.chars().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let err = validate_upload("resume.docx", 100, 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(validate_upload("Resume.PDF", 100, 1024).is_ok());
    }

    #[test]
    fn test_rejects_oversized_upload() {
        let err = validate_upload("resume.pdf", 2048, 1024).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_rejects_empty_upload() {
        let err = validate_upload("resume.pdf", 0, 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_unprocessable() {
        let err = extract_pdf_text(
            "resume.pdf".to_string(),
            Bytes::from_static(b"definitely not a pdf"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}

//! Multipart upload reading shared by the parse and ATS upload endpoints,
//! plus best-effort archiving of the original file to S3.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::parser::MAX_UPLOAD_BYTES;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Fields of a resume upload form. `resume` is the file part, every other
/// part is read as text.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub job_description: Option<String>,
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "file" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "'{filename}' exceeds the {} MiB limit",
                        MAX_UPLOAD_BYTES / (1024 * 1024)
                    )));
                }
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "job_description" | "jobDescription" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid job_description: {e}")))?;
                form.job_description = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Keeps only characters safe inside an object key.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

pub fn archive_key(upload_id: Uuid, filename: &str) -> String {
    format!("uploads/{upload_id}/{}", sanitize_filename(filename))
}

/// Stores the original upload. Returns the object key.
pub async fn archive_upload(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    file: &UploadedFile,
) -> Result<String, AppError> {
    let key = archive_key(Uuid::new_v4(), &file.filename);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(file.bytes.clone()))
        .content_type(
            file.content_type
                .as_deref()
                .unwrap_or("application/octet-stream"),
        )
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload archive failed: {e}")))?;

    info!("Archived upload to s3://{bucket}/{key}");
    Ok(key)
}

/// Archives when storage is configured. Failures are logged, never returned.
pub async fn try_archive(
    s3: Option<&aws_sdk_s3::Client>,
    bucket: Option<&str>,
    file: &UploadedFile,
) -> Option<String> {
    let (s3, bucket) = (s3?, bucket?);
    match archive_upload(s3, bucket, file).await {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Skipping upload archive: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Resume (1).pdf"), "My_Resume__1_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\cv.txt"), "cv.txt");
        assert_eq!(sanitize_filename("..."), "resume");
    }

    #[test]
    fn test_archive_key_layout() {
        let key = archive_key(Uuid::nil(), "cv.pdf");
        assert_eq!(key, "uploads/00000000-0000-0000-0000-000000000000/cv.pdf");
    }

    #[tokio::test]
    async fn test_try_archive_without_storage_is_none() {
        let file = UploadedFile {
            filename: "cv.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::from_static(b"Jane Doe"),
        };
        assert!(try_archive(None, None, &file).await.is_none());
    }
}

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json as DbJson;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::documents::{DocumentFormat, ExtractError};
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::profiler::{analyze, ResumeProfile};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const DEFAULT_FILENAME: &str = "resume";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeResponse {
    pub success: bool,
    pub resume_data: ResumeProfile,
    pub resume_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub filename: String,
    pub suggested_role: String,
    pub suggested_domain: String,
    pub profile: ResumeProfile,
    pub uploaded_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeSummary {
    fn from(row: ResumeRow) -> Self {
        ResumeSummary {
            id: row.id,
            filename: row.filename,
            suggested_role: row.suggested_role,
            suggested_domain: row.suggested_domain,
            profile: row.profile.0,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub success: bool,
    pub resumes: Vec<ResumeSummary>,
}

/// An uploaded file as received from the multipart body.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Size and format checks, before any extraction work.
pub fn validate_upload(upload: &Upload, max_bytes: usize) -> Result<DocumentFormat, AppError> {
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if upload.bytes.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File too large: maximum size is {} MiB",
            max_bytes / (1024 * 1024)
        )));
    }

    let declared = upload
        .content_type
        .as_deref()
        .map(DocumentFormat::from_content_type);
    let format = match declared {
        Some(Ok(format)) => Ok(format),
        _ => DocumentFormat::from_filename(&upload.filename),
    };
    format.map_err(|_| {
        AppError::Validation("Unsupported file type: upload a PDF or plain text resume".to_string())
    })
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file upload: {e}")))?;
        return Ok(Some(Upload {
            filename,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let format = validate_upload(&upload, state.config.max_upload_bytes)?;

    let text = state
        .extractor
        .extract(upload.bytes.clone(), format)
        .await
        .map_err(|e| {
            warn!(user_id = %auth.user_id, filename = %upload.filename, "Resume extraction failed: {e}");
            match e {
                ExtractError::UnsupportedFormat(_) => AppError::Validation(e.to_string()),
                ExtractError::CorruptDocument(_) => {
                    AppError::Validation("Failed to parse resume document".to_string())
                }
            }
        })?;

    let profile = analyze(&text);

    let resume_id = Uuid::new_v4();
    let s3_key = format!("resumes/{}/{}.{}", auth.user_id, resume_id, format.extension());
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(upload.bytes))
        .content_type(format.content_type())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{}/{}", state.config.s3_bucket, s3_key);

    sqlx::query(
        r#"
        INSERT INTO resumes (id, user_id, filename, s3_key, profile, suggested_role, suggested_domain)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(resume_id)
    .bind(auth.user_id)
    .bind(&upload.filename)
    .bind(&s3_key)
    .bind(DbJson(&profile))
    .bind(&profile.suggested_role)
    .bind(&profile.suggested_domain)
    .execute(&state.db)
    .await?;

    info!(
        user_id = %auth.user_id,
        %resume_id,
        skills = profile.skills.len(),
        domain = %profile.suggested_domain,
        "Resume parsed"
    );

    Ok(Json(ParseResumeResponse {
        success: true,
        resume_data: profile,
        resume_id,
        message: "Resume parsed successfully".to_string(),
    }))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResumeListResponse>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ResumeListResponse {
        success: true,
        resumes: rows.into_iter().map(ResumeSummary::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1024 * 1024;

    fn upload(filename: &str, content_type: Option<&str>, bytes: &'static [u8]) -> Upload {
        Upload {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_declared_content_type_wins() {
        let format = validate_upload(&upload("cv.txt", Some("application/pdf"), b"%PDF"), MAX).unwrap();
        assert_eq!(format, DocumentFormat::Pdf);
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        let format = validate_upload(
            &upload("cv.pdf", Some("application/octet-stream"), b"%PDF"),
            MAX,
        )
        .unwrap();
        assert_eq!(format, DocumentFormat::Pdf);

        let format = validate_upload(&upload("cv.txt", None, b"hello"), MAX).unwrap();
        assert_eq!(format, DocumentFormat::PlainText);
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let err = validate_upload(&upload("cv.docx", Some("application/msword"), b"doc"), MAX)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Unsupported file type")));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(
            validate_upload(&upload("cv.pdf", Some("application/pdf"), b""), MAX),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let exact = validate_upload(&upload("cv.txt", Some("text/plain"), b"abcd"), 4);
        assert!(exact.is_ok());
        let over = validate_upload(&upload("cv.txt", Some("text/plain"), b"abcde"), 4);
        assert!(matches!(over, Err(AppError::Validation(msg)) if msg.starts_with("File too large")));
    }
}

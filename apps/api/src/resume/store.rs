use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeData, ResumeRow};

/// Display title for a stored resume: name and job title, or a fallback.
pub fn derive_title(resume: &ResumeData) -> String {
    let name = resume.personal_info.full_name.trim();
    let job = resume.personal_info.job_title.trim();
    match (name.is_empty(), job.is_empty()) {
        (false, false) => format!("{name} — {job}"),
        (false, true) => name.to_string(),
        (true, false) => job.to_string(),
        (true, true) => "Untitled resume".to_string(),
    }
}

fn to_json(resume: &ResumeData) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode resume: {e}")))
}

pub async fn create_resume(
    pool: &PgPool,
    user_id: Option<Uuid>,
    resume: &ResumeData,
) -> Result<ResumeRow, AppError> {
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, title, data)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(derive_title(resume))
    .bind(to_json(resume)?)
    .fetch_one(pool)
    .await?;

    info!("Created resume {id}");
    Ok(row)
}

pub async fn get_resume(pool: &PgPool, id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Replaces the document. A stale `ats_score` is cleared since the text changed.
pub async fn update_resume(
    pool: &PgPool,
    id: Uuid,
    resume: &ResumeData,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET title = $2, data = $3, ats_score = NULL, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(derive_title(resume))
    .bind(to_json(resume)?)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    info!("Updated resume {id}");
    Ok(row)
}

/// Both writes below report a missing row as `NotFound` rather than a silent no-op.
fn ensure_affected(rows_affected: u64, id: Uuid) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(())
}

pub async fn record_ats_score(pool: &PgPool, id: Uuid, score: u32) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE resumes SET ats_score = $2 WHERE id = $1")
        .bind(id)
        .bind(score as i32)
        .execute(pool)
        .await?;

    ensure_affected(result.rows_affected(), id)
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_resume(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    ensure_affected(result.rows_affected(), id)?;
    info!("Deleted resume {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;

    fn with_info(full_name: &str, job_title: &str) -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: full_name.to_string(),
                job_title: job_title.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_derive_title_variants() {
        assert_eq!(derive_title(&with_info("Jane", "SRE")), "Jane — SRE");
        assert_eq!(derive_title(&with_info("Jane", " ")), "Jane");
        assert_eq!(derive_title(&with_info("", "SRE")), "SRE");
        assert_eq!(derive_title(&with_info("", "")), "Untitled resume");
    }

    #[test]
    fn test_to_json_uses_camel_case() {
        let value = to_json(&with_info("Jane", "SRE")).unwrap();
        assert_eq!(value["personalInfo"]["fullName"], "Jane");
    }

    #[test]
    fn test_ensure_affected_maps_zero_rows_to_not_found() {
        let id = Uuid::new_v4();
        assert!(ensure_affected(1, id).is_ok());
        let err = ensure_affected(0, id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains(&id.to_string()));
    }
}

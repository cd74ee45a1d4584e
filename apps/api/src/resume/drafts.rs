use redis::AsyncCommands;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeData;

fn draft_key(id: Uuid) -> String {
    format!("resume:draft:{id}")
}

/// Autosaves an in-progress document. Each save resets the expiry.
pub async fn save_draft(
    redis: &redis::Client,
    id: Uuid,
    resume: &ResumeData,
    ttl_secs: u64,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode draft: {e}")))?;

    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex::<_, _, ()>(draft_key(id), payload, ttl_secs)
        .await?;

    info!("Saved draft for resume {id} (ttl {ttl_secs}s)");
    Ok(())
}

pub async fn load_draft(redis: &redis::Client, id: Uuid) -> Result<ResumeData, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let payload: Option<String> = conn.get(draft_key(id)).await?;

    let payload =
        payload.ok_or_else(|| AppError::NotFound(format!("No draft saved for resume {id}")))?;
    decode_draft(&payload)
}

pub async fn discard_draft(redis: &redis::Client, id: Uuid) -> Result<(), AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let removed: u32 = conn.del(draft_key(id)).await?;
    if removed == 0 {
        return Err(AppError::NotFound(format!("No draft saved for resume {id}")));
    }
    Ok(())
}

fn decode_draft(payload: &str) -> Result<ResumeData, AppError> {
    serde_json::from_str(payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored draft is corrupt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            draft_key(id),
            "resume:draft:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_decode_draft() {
        let draft = decode_draft(r#"{"personalInfo":{"fullName":"Jane"},"skills":["Rust"]}"#)
            .unwrap();
        assert_eq!(draft.personal_info.full_name, "Jane");
        assert_eq!(draft.skills, vec!["Rust"]);
    }

    #[test]
    fn test_decode_corrupt_draft_is_internal() {
        assert!(matches!(decode_draft("not json"), Err(AppError::Internal(_))));
    }
}

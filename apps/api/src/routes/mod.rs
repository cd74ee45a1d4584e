pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::assist::handlers as assist;
use crate::ats::handlers as ats;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // ATS
        .route("/api/ats/check", post(ats::handle_ats_check))
        .route("/api/ats/check/upload", post(ats::handle_ats_check_upload))
        // Resume documents
        .route("/api/resume", post(resume::handle_create_resume))
        .route("/api/resume/parse", post(resume::handle_parse_upload))
        .route("/api/resume/convert", post(resume::handle_convert))
        .route(
            "/api/resume/:id",
            get(resume::handle_get_resume)
                .put(resume::handle_update_resume)
                .delete(resume::handle_delete_resume),
        )
        .route(
            "/api/resume/:id/draft",
            put(resume::handle_save_draft)
                .get(resume::handle_load_draft)
                .delete(resume::handle_discard_draft),
        )
        .route("/api/resume/:id/score", post(resume::handle_score_stored))
        .route("/api/resumes", get(resume::handle_list_resumes))
        // AI assist
        .route("/api/ai/summary", post(assist::handle_summary))
        .route("/api/ai/bullets", post(assist::handle_bullets))
        .route("/api/ai/skills", post(assist::handle_skills))
        .route("/api/ai/tailor", post(assist::handle_tailor))
        .with_state(state)
}

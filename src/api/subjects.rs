use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::subjects;
use crate::error::AppError;
use crate::models::{Subject, SubjectRequest};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/disabled", get(list_disabled_subjects))
        .route(
            "/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(subjects::fetch_subjects(&state.db, false).await?))
}

async fn list_disabled_subjects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subject>>, AppError> {
    Ok(Json(subjects::fetch_subjects(&state.db, true).await?))
}

async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    let subject = subjects::find_subject_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject", &id))?;
    Ok(Json(subject))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<SubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    req.validate()?;
    let subject = subjects::insert_subject(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

// Views show `subject_for_site`, not the subject name, so nothing to evict.
async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    req.validate()?;
    let subject = subjects::update_subject(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Subject", &id))?;
    Ok(Json(subject))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if subjects::delete_subject(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Subject", &id))
    }
}

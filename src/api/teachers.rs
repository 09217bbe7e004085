use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::teachers;
use crate::error::AppError;
use crate::models::{Teacher, TeacherRequest};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/teachers/disabled", get(list_disabled_teachers))
        .route(
            "/teachers/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
}

async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(teachers::fetch_teachers(&state.db, false).await?))
}

async fn list_disabled_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(teachers::fetch_teachers(&state.db, true).await?))
}

async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = teachers::find_teacher_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Teacher", &id))?;
    Ok(Json(teacher))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<TeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    req.validate()?;
    let teacher = teachers::insert_teacher(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TeacherRequest>,
) -> Result<Json<Teacher>, AppError> {
    req.validate()?;
    let teacher = teachers::update_teacher(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Teacher", &id))?;
    state.cache.evict_all().await;
    Ok(Json(teacher))
}

async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !teachers::delete_teacher(&state.db, &id).await? {
        return Err(AppError::not_found("Teacher", &id));
    }
    state.cache.evict_all().await;
    Ok(StatusCode::NO_CONTENT)
}

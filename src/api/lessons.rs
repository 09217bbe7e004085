use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::{lessons, subjects};
use crate::error::AppError;
use crate::models::{Lesson, LessonRequest, LessonType};
use crate::state::AppState;

#[derive(Deserialize)]
struct LessonParams {
    group_id: Option<String>,
    teacher_id: Option<String>,
    semester_id: Option<String>,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons).post(create_lesson))
        .route("/lessons/types", get(list_lesson_types))
        .route("/lessons/{id}", get(get_lesson).put(update_lesson).delete(delete_lesson))
}

async fn list_lessons(
    State(state): State<AppState>,
    Query(params): Query<LessonParams>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons = if let Some(group_id) = params.group_id {
        lessons::fetch_lessons_by_group(&state.db, &group_id).await?
    } else if let Some(teacher_id) = params.teacher_id {
        lessons::fetch_lessons_by_teacher(&state.db, &teacher_id).await?
    } else if let Some(semester_id) = params.semester_id {
        lessons::fetch_lessons_by_semester(&state.db, &semester_id).await?
    } else {
        lessons::fetch_lessons(&state.db).await?
    };
    Ok(Json(lessons))
}

async fn list_lesson_types() -> Json<Vec<LessonType>> {
    Json(LessonType::ALL.to_vec())
}

async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = lessons::find_lesson_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Lesson", &id))?;
    Ok(Json(lesson))
}

// A blank display name falls back to the subject's name.
async fn resolve_subject_for_site(
    state: &AppState,
    req: &mut LessonRequest,
) -> Result<(), AppError> {
    let subject = subjects::find_subject_by_id(&state.db, &req.subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject", &req.subject_id))?;
    if req.subject_for_site.trim().is_empty() {
        req.subject_for_site = subject.name;
    } else {
        req.subject_for_site = req.subject_for_site.trim().to_string();
    }
    Ok(())
}

async fn create_lesson(
    State(state): State<AppState>,
    Json(mut req): Json<LessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    req.validate()?;
    resolve_subject_for_site(&state, &mut req).await?;
    let lesson = lessons::insert_lesson(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut req): Json<LessonRequest>,
) -> Result<Json<Lesson>, AppError> {
    req.validate()?;
    resolve_subject_for_site(&state, &mut req).await?;
    let lesson = lessons::update_lesson(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Lesson", &id))?;
    state.cache.evict_all().await;
    Ok(Json(lesson))
}

async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let lesson = lessons::find_lesson_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Lesson", &id))?;
    lessons::delete_lesson(&state.db, &id).await?;
    state.cache.evict_semester(&lesson.semester_id).await;
    Ok(StatusCode::NO_CONTENT)
}

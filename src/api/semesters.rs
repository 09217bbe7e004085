use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::semesters;
use crate::error::AppError;
use crate::models::{Semester, SemesterDetails, SemesterRequest};
use crate::state::AppState;

#[derive(Deserialize)]
struct SemesterParams {
    semester_id: String,
}

#[derive(Deserialize)]
struct AddGroupsRequest {
    group_ids: Vec<String>,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/semesters", get(list_semesters).post(create_semester))
        .route("/semesters/disabled", get(list_disabled_semesters))
        .route("/semesters/current", get(get_current_semester).put(change_current_semester))
        .route("/semesters/default", get(get_default_semester).put(change_default_semester))
        .route(
            "/semesters/{id}",
            get(get_semester).put(update_semester).delete(delete_semester),
        )
        .route("/semesters/{id}/groups", put(add_groups))
}

async fn details(state: &AppState, id: &str) -> Result<SemesterDetails, AppError> {
    semesters::load_semester_details(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Semester", id))
}

async fn list_semesters(State(state): State<AppState>) -> Result<Json<Vec<Semester>>, AppError> {
    Ok(Json(semesters::fetch_semesters(&state.db, false).await?))
}

async fn list_disabled_semesters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Semester>>, AppError> {
    Ok(Json(semesters::fetch_semesters(&state.db, true).await?))
}

async fn get_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SemesterDetails>, AppError> {
    Ok(Json(details(&state, &id).await?))
}

async fn get_current_semester(
    State(state): State<AppState>,
) -> Result<Json<SemesterDetails>, AppError> {
    let current = semesters::find_current_semester(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No semester is marked as current".to_string()))?;
    Ok(Json(details(&state, &current.id).await?))
}

async fn get_default_semester(
    State(state): State<AppState>,
) -> Result<Json<SemesterDetails>, AppError> {
    let default = semesters::find_default_semester(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No semester is marked as default".to_string()))?;
    Ok(Json(details(&state, &default.id).await?))
}

async fn change_current_semester(
    State(state): State<AppState>,
    Query(params): Query<SemesterParams>,
) -> Result<Json<SemesterDetails>, AppError> {
    if !semesters::set_current_semester(&state.db, &params.semester_id).await? {
        return Err(AppError::not_found("Semester", &params.semester_id));
    }
    Ok(Json(details(&state, &params.semester_id).await?))
}

async fn change_default_semester(
    State(state): State<AppState>,
    Query(params): Query<SemesterParams>,
) -> Result<Json<SemesterDetails>, AppError> {
    if !semesters::set_default_semester(&state.db, &params.semester_id).await? {
        return Err(AppError::not_found("Semester", &params.semester_id));
    }
    Ok(Json(details(&state, &params.semester_id).await?))
}

async fn create_semester(
    State(state): State<AppState>,
    Json(req): Json<SemesterRequest>,
) -> Result<(StatusCode, Json<SemesterDetails>), AppError> {
    req.validate()?;
    let semester = semesters::insert_semester(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(semester)))
}

async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SemesterRequest>,
) -> Result<Json<SemesterDetails>, AppError> {
    req.validate()?;
    let semester = semesters::update_semester(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Semester", &id))?;
    state.cache.evict_all().await;
    Ok(Json(semester))
}

async fn add_groups(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddGroupsRequest>,
) -> Result<Json<SemesterDetails>, AppError> {
    details(&state, &id).await?;
    semesters::add_groups_to_semester(&state.db, &id, &req.group_ids).await?;
    state.cache.evict_semester(&id).await;
    Ok(Json(details(&state, &id).await?))
}

async fn delete_semester(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !semesters::delete_semester(&state.db, &id).await? {
        return Err(AppError::not_found("Semester", &id));
    }
    state.cache.evict_all().await;
    Ok(StatusCode::NO_CONTENT)
}

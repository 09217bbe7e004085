use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::{departments, teachers};
use crate::error::AppError;
use crate::models::{Department, DepartmentRequest, Teacher};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/disabled", get(list_disabled_departments))
        .route(
            "/departments/{id}",
            get(get_department).put(update_department).delete(delete_department),
        )
        .route("/departments/{id}/teachers", get(list_department_teachers))
}

async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(departments::fetch_departments(&state.db, false).await?))
}

async fn list_disabled_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(departments::fetch_departments(&state.db, true).await?))
}

async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Department>, AppError> {
    let department = departments::find_department_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Department", &id))?;
    Ok(Json(department))
}

async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<DepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    req.validate()?;
    let department = departments::insert_department(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DepartmentRequest>,
) -> Result<Json<Department>, AppError> {
    req.validate()?;
    let department = departments::update_department(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Department", &id))?;
    Ok(Json(department))
}

async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if departments::delete_department(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Department", &id))
    }
}

async fn list_department_teachers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    departments::find_department_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Department", &id))?;
    Ok(Json(teachers::fetch_teachers_by_department(&state.db, &id).await?))
}

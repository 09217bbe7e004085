use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::groups;
use crate::error::AppError;
use crate::models::{Group, GroupRequest};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/disabled", get(list_disabled_groups))
        .route("/groups/ordered", get(list_ordered_groups))
        .route("/groups/{id}", get(get_group).put(update_group).delete(delete_group))
}

async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(groups::fetch_groups(&state.db, false).await?))
}

async fn list_disabled_groups(State(state): State<AppState>) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(groups::fetch_groups(&state.db, true).await?))
}

async fn list_ordered_groups(State(state): State<AppState>) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(groups::fetch_groups_ordered(&state.db).await?))
}

async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, AppError> {
    let group = groups::find_group_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Group", &id))?;
    Ok(Json(group))
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<GroupRequest>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    req.validate()?;
    let group = groups::insert_group(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<GroupRequest>,
) -> Result<Json<Group>, AppError> {
    req.validate()?;
    let group = groups::update_group(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Group", &id))?;
    state.cache.evict_all().await;
    Ok(Json(group))
}

async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !groups::delete_group(&state.db, &id).await? {
        return Err(AppError::not_found("Group", &id));
    }
    state.cache.evict_all().await;
    Ok(StatusCode::NO_CONTENT)
}

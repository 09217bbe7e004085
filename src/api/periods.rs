use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::db::periods;
use crate::error::AppError;
use crate::models::{Period, PeriodRequest};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods", get(list_periods).post(create_period))
        .route("/periods/all", post(create_periods))
        .route("/periods/{id}", get(get_period).put(update_period).delete(delete_period))
}

async fn list_periods(State(state): State<AppState>) -> Result<Json<Vec<Period>>, AppError> {
    Ok(Json(periods::fetch_periods(&state.db).await?))
}

async fn get_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Period>, AppError> {
    let period = periods::find_period_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Period", &id))?;
    Ok(Json(period))
}

async fn create_period(
    State(state): State<AppState>,
    Json(req): Json<PeriodRequest>,
) -> Result<(StatusCode, Json<Period>), AppError> {
    req.validate()?;
    let period = periods::insert_period(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

/// Creates all periods or none.
async fn create_periods(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<PeriodRequest>>,
) -> Result<(StatusCode, Json<Vec<Period>>), AppError> {
    for req in &reqs {
        req.validate()?;
    }
    let created = periods::insert_periods(&state.db, reqs).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PeriodRequest>,
) -> Result<Json<Period>, AppError> {
    req.validate()?;
    let period = periods::update_period(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Period", &id))?;
    state.cache.evict_all().await;
    Ok(Json(period))
}

async fn delete_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !periods::delete_period(&state.db, &id).await? {
        return Err(AppError::not_found("Period", &id));
    }
    state.cache.evict_all().await;
    Ok(StatusCode::NO_CONTENT)
}

mod departments;
mod groups;
mod lessons;
mod periods;
mod rooms;
mod schedules;
mod semesters;
mod subjects;
mod teachers;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(departments::routes())
        .merge(teachers::routes())
        .merge(groups::routes())
        .merge(rooms::routes())
        .merge(subjects::routes())
        .merge(periods::routes())
        .merge(semesters::routes())
        .merge(lessons::routes())
        .merge(schedules::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

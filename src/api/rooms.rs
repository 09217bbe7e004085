use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::rooms;
use crate::error::AppError;
use crate::models::{DayOfWeek, EvenOdd, Room, RoomRequest, RoomType, RoomTypeRequest};
use crate::state::AppState;

#[derive(Deserialize)]
struct AvailableRoomsParams {
    semester_id: String,
    day_of_week: DayOfWeek,
    even_odd: EvenOdd,
    period_id: String,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/room-types", get(list_room_types).post(create_room_type))
        .route(
            "/room-types/{id}",
            get(get_room_type).put(update_room_type).delete(delete_room_type),
        )
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/disabled", get(list_disabled_rooms))
        .route("/rooms/ordered", get(list_ordered_rooms))
        .route("/rooms/available", get(list_available_rooms))
        .route("/rooms/{id}", get(get_room).put(update_room).delete(delete_room))
}

async fn list_room_types(State(state): State<AppState>) -> Result<Json<Vec<RoomType>>, AppError> {
    Ok(Json(rooms::fetch_room_types(&state.db).await?))
}

async fn get_room_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoomType>, AppError> {
    let room_type = rooms::find_room_type_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Room type", &id))?;
    Ok(Json(room_type))
}

async fn create_room_type(
    State(state): State<AppState>,
    Json(req): Json<RoomTypeRequest>,
) -> Result<(StatusCode, Json<RoomType>), AppError> {
    req.validate()?;
    let room_type = rooms::insert_room_type(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(room_type)))
}

async fn update_room_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RoomTypeRequest>,
) -> Result<Json<RoomType>, AppError> {
    req.validate()?;
    let room_type = rooms::update_room_type(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Room type", &id))?;
    state.cache.evict_all().await;
    Ok(Json(room_type))
}

async fn delete_room_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if rooms::delete_room_type(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Room type", &id))
    }
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    Ok(Json(rooms::fetch_rooms(&state.db, false).await?))
}

async fn list_disabled_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    Ok(Json(rooms::fetch_rooms(&state.db, true).await?))
}

async fn list_ordered_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    Ok(Json(rooms::fetch_rooms_ordered(&state.db).await?))
}

async fn list_available_rooms(
    State(state): State<AppState>,
    Query(params): Query<AvailableRoomsParams>,
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = rooms::fetch_available_rooms(
        &state.db,
        &params.semester_id,
        params.day_of_week,
        params.even_odd,
        &params.period_id,
    )
    .await?;
    Ok(Json(rooms))
}

async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Room>, AppError> {
    let room = rooms::find_room_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Room", &id))?;
    Ok(Json(room))
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<RoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    req.validate()?;
    let room = rooms::insert_room(&state.db, req).await?;
    // New rooms show up in the room views.
    state.cache.evict_all().await;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RoomRequest>,
) -> Result<Json<Room>, AppError> {
    req.validate()?;
    let room = rooms::update_room(&state.db, &id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Room", &id))?;
    state.cache.evict_all().await;
    Ok(Json(room))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !rooms::delete_room(&state.db, &id).await? {
        return Err(AppError::not_found("Room", &id));
    }
    state.cache.evict_all().await;
    Ok(StatusCode::NO_CONTENT)
}

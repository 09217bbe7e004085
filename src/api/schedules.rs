use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::schedules;
use crate::error::AppError;
use crate::models::{ChangeRoomRequest, Schedule, ScheduleSaveRequest};
use crate::schedule::{ScheduleForGroup, ScheduleForRoom, ScheduleForTeacher, ScheduleFull};
use crate::services::{CreateScheduleInfo, SlotQuery};
use crate::state::AppState;

#[derive(Deserialize)]
struct SemesterParams {
    semester_id: Option<String>,
}

#[derive(Deserialize)]
struct ViewParams {
    semester_id: String,
}

#[derive(Deserialize)]
struct GroupViewParams {
    semester_id: String,
    group_id: Option<String>,
}

#[derive(Deserialize)]
struct TeacherViewParams {
    semester_id: String,
    teacher_id: Option<String>,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_schedules).post(save_schedule))
        .route("/schedules/data-before", get(info_before_create))
        .route("/schedules/full/rooms", get(full_rooms))
        .route("/schedules/full/groups", get(full_groups))
        .route("/schedules/full/teachers", get(full_teachers))
        .route("/schedules/full/semester", get(full_semester))
        .route("/schedules/{id}", get(get_schedule).delete(delete_schedule))
        .route("/schedules/{id}/room", put(change_room))
        .route("/semesters/{id}/schedules", delete(delete_semester_schedules))
}

async fn list_schedules(
    State(state): State<AppState>,
    Query(params): Query<SemesterParams>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = match params.semester_id {
        Some(semester_id) => schedules::fetch_schedules_by_semester(&state.db, &semester_id).await?,
        None => schedules::fetch_schedules(&state.db).await?,
    };
    Ok(Json(schedules))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = schedules::find_schedule_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Schedule", &id))?;
    Ok(Json(schedule))
}

async fn info_before_create(
    State(state): State<AppState>,
    Query(slot): Query<SlotQuery>,
) -> Result<Json<CreateScheduleInfo>, AppError> {
    let info = state.schedule_service().info_before_create(&slot).await?;
    Ok(Json(info))
}

async fn save_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleSaveRequest>,
) -> Result<(StatusCode, Json<Vec<Schedule>>), AppError> {
    let saved = state.schedule_service().save(req).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.schedule_service().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoomRequest>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = state.schedule_service().change_room(&id, &req.room_id).await?;
    Ok(Json(schedule))
}

async fn delete_semester_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.schedule_service().delete_by_semester(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn full_rooms(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Vec<ScheduleForRoom>>, AppError> {
    Ok(Json(state.view_service().rooms(&params.semester_id).await?))
}

async fn full_groups(
    State(state): State<AppState>,
    Query(params): Query<GroupViewParams>,
) -> Result<Json<Vec<ScheduleForGroup>>, AppError> {
    let views = state
        .view_service()
        .groups(&params.semester_id, params.group_id.as_deref())
        .await?;
    Ok(Json(views))
}

async fn full_teachers(
    State(state): State<AppState>,
    Query(params): Query<TeacherViewParams>,
) -> Result<Json<Vec<ScheduleForTeacher>>, AppError> {
    let views = state
        .view_service()
        .teachers(&params.semester_id, params.teacher_id.as_deref())
        .await?;
    Ok(Json(views))
}

async fn full_semester(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Json<ScheduleFull>, AppError> {
    Ok(Json(state.view_service().full(&params.semester_id).await?))
}

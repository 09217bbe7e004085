use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::cache::ScheduleCache;
use crate::db::{lessons, periods, rooms, schedules};
use crate::error::AppError;
use crate::models::{DayOfWeek, EvenOdd, Room, Schedule, ScheduleSaveRequest};

/// Slot a new assignment is about to be placed into.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub semester_id: String,
    pub day_of_week: DayOfWeek,
    pub even_odd: EvenOdd,
    pub period_id: String,
    pub lesson_id: String,
}

#[derive(Debug, Serialize)]
pub struct RoomAvailability {
    #[serde(flatten)]
    pub room: Room,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateScheduleInfo {
    pub teacher_available: bool,
    pub rooms: Vec<RoomAvailability>,
}

/// Writes to the timetable. Every successful write evicts the cached
/// views of the semester it touched.
pub struct ScheduleService {
    db: SqlitePool,
    cache: Arc<dyn ScheduleCache>,
}

impl ScheduleService {
    pub fn new(db: SqlitePool, cache: Arc<dyn ScheduleCache>) -> Self {
        Self { db, cache }
    }

    /// What the editor needs before dropping a lesson into a slot: whether
    /// the teacher is free and which rooms are.
    pub async fn info_before_create(
        &self,
        slot: &SlotQuery,
    ) -> Result<CreateScheduleInfo, AppError> {
        let lesson = lessons::find_lesson_by_id(&self.db, &slot.lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson", &slot.lesson_id))?;

        let group_conflicts = schedules::count_group_conflicts(
            &self.db,
            &slot.semester_id,
            slot.day_of_week,
            slot.even_odd,
            &slot.period_id,
            &lesson.group_id,
        )
        .await?;
        if group_conflicts > 0 {
            warn!("group {} is already busy in the requested slot", lesson.group_id);
            return Err(AppError::Conflict(
                "The group already has a lesson in this slot".to_string(),
            ));
        }

        let teacher_conflicts = schedules::count_teacher_conflicts(
            &self.db,
            &slot.semester_id,
            slot.day_of_week,
            slot.even_odd,
            &slot.period_id,
            &lesson.teacher_id,
        )
        .await?;

        let free: Vec<String> = rooms::fetch_available_rooms(
            &self.db,
            &slot.semester_id,
            slot.day_of_week,
            slot.even_odd,
            &slot.period_id,
        )
        .await?
        .into_iter()
        .map(|room| room.id)
        .collect();

        let rooms = rooms::fetch_rooms_ordered(&self.db)
            .await?
            .into_iter()
            .map(|room| {
                let available = free.contains(&room.id);
                RoomAvailability { room, available }
            })
            .collect();

        Ok(CreateScheduleInfo {
            teacher_available: teacher_conflicts == 0,
            rooms,
        })
    }

    /// Places the lesson, and every lesson grouped with it, into the slot.
    /// Either all of them are saved or none.
    pub async fn save(&self, req: ScheduleSaveRequest) -> Result<Vec<Schedule>, AppError> {
        info!(
            "saving lesson {} into {} {:?} period {}",
            req.lesson_id,
            req.day_of_week.as_str(),
            req.even_odd,
            req.period_id
        );

        let lesson = lessons::find_lesson_by_id(&self.db, &req.lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson", &req.lesson_id))?;
        rooms::find_room_by_id(&self.db, &req.room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Room", &req.room_id))?;
        periods::find_period_by_id(&self.db, &req.period_id)
            .await?
            .ok_or_else(|| AppError::not_found("Period", &req.period_id))?;

        let targets = lessons::fetch_grouped_lessons(&self.db, &lesson).await?;

        let mut tx = self.db.begin().await?;
        let mut saved = Vec::with_capacity(targets.len());
        for target in &targets {
            let already_placed = schedules::count_lesson_in_slot(
                &mut *tx,
                &target.id,
                req.day_of_week,
                req.even_odd,
                &req.period_id,
            )
            .await?;
            if already_placed > 0 {
                warn!("lesson {} already sits in the requested slot", target.id);
                return Err(AppError::Conflict(
                    "The lesson is already scheduled in this slot".to_string(),
                ));
            }

            let group_conflicts = schedules::count_group_conflicts(
                &mut *tx,
                &target.semester_id,
                req.day_of_week,
                req.even_odd,
                &req.period_id,
                &target.group_id,
            )
            .await?;
            if group_conflicts > 0 {
                warn!("group {} is already busy in the requested slot", target.group_id);
                return Err(AppError::Conflict(
                    "The group already has a lesson in this slot".to_string(),
                ));
            }

            let schedule = schedules::insert_schedule(
                &mut *tx,
                &target.id,
                &req.room_id,
                &req.period_id,
                req.day_of_week,
                req.even_odd,
            )
            .await?;
            saved.push(schedule);
        }
        tx.commit().await?;

        self.cache.evict_semester(&lesson.semester_id).await;
        info!("saved {} schedule(s) for lesson {}", saved.len(), lesson.id);
        Ok(saved)
    }

    /// Removes the assignment together with the assignments of its grouped
    /// lessons in the same slot. Returns the removed ids.
    pub async fn delete(&self, id: &str) -> Result<Vec<String>, AppError> {
        let schedule = schedules::find_schedule_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule", id))?;
        let lesson = lessons::find_lesson_by_id(&self.db, &schedule.lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson", &schedule.lesson_id))?;

        let lesson_ids: Vec<String> = lessons::fetch_grouped_lessons(&self.db, &lesson)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();
        let mut ids: Vec<String> = schedules::fetch_schedules_in_slot(
            &self.db,
            &lesson_ids,
            schedule.day_of_week,
            schedule.even_odd,
            &schedule.period_id,
        )
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
        if !ids.contains(&schedule.id) {
            ids.push(schedule.id.clone());
        }

        let mut tx = self.db.begin().await?;
        for schedule_id in &ids {
            schedules::delete_schedule(&mut *tx, schedule_id).await?;
        }
        tx.commit().await?;

        self.cache.evict_semester(&lesson.semester_id).await;
        info!("deleted {} schedule(s) starting from {}", ids.len(), id);
        Ok(ids)
    }

    pub async fn change_room(&self, id: &str, room_id: &str) -> Result<Schedule, AppError> {
        info!("moving schedule {} to room {}", id, room_id);

        let mut schedule = schedules::find_schedule_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Schedule", id))?;
        if schedule.room_id == room_id {
            return Ok(schedule);
        }

        rooms::find_room_by_id(&self.db, room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Room", room_id))?;
        schedules::update_schedule_room(&self.db, id, room_id).await?;
        schedule.room_id = room_id.to_string();

        if let Some(lesson) = lessons::find_lesson_by_id(&self.db, &schedule.lesson_id).await? {
            self.cache.evict_semester(&lesson.semester_id).await;
        }
        Ok(schedule)
    }

    pub async fn delete_by_semester(&self, semester_id: &str) -> Result<u64, AppError> {
        let removed = schedules::delete_schedules_by_semester(&self.db, semester_id).await?;
        self.cache.evict_semester(semester_id).await;
        info!("deleted {} schedule(s) of semester {}", removed, semester_id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoopScheduleCache;
    use crate::db::setup_test_db;
    use crate::db::test_data::{Catalog, seed_catalog, seed_lesson};
    use crate::models::Lesson;

    fn service(pool: &SqlitePool) -> ScheduleService {
        ScheduleService::new(pool.clone(), Arc::new(NoopScheduleCache))
    }

    fn request(
        lesson: &Lesson,
        catalog: &Catalog,
        room: usize,
        even_odd: EvenOdd,
    ) -> ScheduleSaveRequest {
        ScheduleSaveRequest {
            lesson_id: lesson.id.clone(),
            room_id: catalog.rooms[room].clone(),
            period_id: catalog.periods[0].clone(),
            day_of_week: DayOfWeek::Monday,
            even_odd,
        }
    }

    #[tokio::test]
    async fn test_save_rejects_group_conflict() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);

        let first = seed_lesson(&pool, &catalog, 0, 0, false).await;
        let second = seed_lesson(&pool, &catalog, 1, 0, false).await;

        service
            .save(request(&first, &catalog, 0, EvenOdd::Weekly))
            .await
            .expect("first save should succeed");

        let err = service
            .save(request(&second, &catalog, 1, EvenOdd::Odd))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_allows_opposite_parity() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);

        let first = seed_lesson(&pool, &catalog, 0, 0, false).await;
        let second = seed_lesson(&pool, &catalog, 1, 0, false).await;

        service.save(request(&first, &catalog, 0, EvenOdd::Even)).await.unwrap();
        let saved = service.save(request(&second, &catalog, 0, EvenOdd::Odd)).await.unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_grouped_save_and_delete_fan_out() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);

        let first = seed_lesson(&pool, &catalog, 0, 0, true).await;
        seed_lesson(&pool, &catalog, 0, 1, true).await;

        let saved = service.save(request(&first, &catalog, 0, EvenOdd::Weekly)).await.unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|s| s.room_id == catalog.rooms[0]));

        let removed = service.delete(&saved[1].id).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(schedules::fetch_schedules_by_semester(&pool, &catalog.semester_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_grouped_save_is_all_or_nothing() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);

        let grouped = seed_lesson(&pool, &catalog, 0, 0, true).await;
        seed_lesson(&pool, &catalog, 0, 1, true).await;
        // Occupies the second group, so the fan-out must fail.
        let blocker = seed_lesson(&pool, &catalog, 1, 1, false).await;
        service.save(request(&blocker, &catalog, 1, EvenOdd::Even)).await.unwrap();

        let err = service.save(request(&grouped, &catalog, 0, EvenOdd::Even)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let remaining = schedules::fetch_schedules_by_semester(&pool, &catalog.semester_id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].lesson_id, blocker.id);
    }

    #[tokio::test]
    async fn test_save_missing_references() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);
        let lesson = seed_lesson(&pool, &catalog, 0, 0, false).await;

        let mut req = request(&lesson, &catalog, 0, EvenOdd::Even);
        req.room_id = "missing".to_string();
        assert!(matches!(service.save(req).await.unwrap_err(), AppError::NotFound(_)));

        let mut req = request(&lesson, &catalog, 0, EvenOdd::Even);
        req.lesson_id = "missing".to_string();
        assert!(matches!(service.save(req).await.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_info_before_create() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);

        let placed = seed_lesson(&pool, &catalog, 0, 0, false).await;
        service.save(request(&placed, &catalog, 0, EvenOdd::Even)).await.unwrap();

        // Same teacher, other group.
        let candidate = seed_lesson(&pool, &catalog, 0, 1, false).await;
        let info = service
            .info_before_create(&SlotQuery {
                semester_id: catalog.semester_id.clone(),
                day_of_week: DayOfWeek::Monday,
                even_odd: EvenOdd::Weekly,
                period_id: catalog.periods[0].clone(),
                lesson_id: candidate.id.clone(),
            })
            .await
            .unwrap();

        assert!(!info.teacher_available);
        assert_eq!(info.rooms.len(), 2);
        assert!(!info.rooms[0].available);
        assert!(info.rooms[1].available);

        // The placed lesson's own group is busy.
        let err = service
            .info_before_create(&SlotQuery {
                semester_id: catalog.semester_id.clone(),
                day_of_week: DayOfWeek::Monday,
                even_odd: EvenOdd::Even,
                period_id: catalog.periods[0].clone(),
                lesson_id: placed.id.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_change_room() {
        let pool = setup_test_db().await;
        let catalog = seed_catalog(&pool).await;
        let service = service(&pool);
        let lesson = seed_lesson(&pool, &catalog, 0, 0, false).await;
        let saved = service.save(request(&lesson, &catalog, 0, EvenOdd::Even)).await.unwrap();

        let moved = service.change_room(&saved[0].id, &catalog.rooms[1]).await.unwrap();
        assert_eq!(moved.room_id, catalog.rooms[1]);

        let err = service.change_room(&saved[0].id, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.change_room("missing", &catalog.rooms[0]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

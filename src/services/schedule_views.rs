use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::cache::{CacheKey, ScheduleCache, ViewKind};
use crate::db::{groups, rooms, schedules, semesters, teachers};
use crate::error::AppError;
use crate::models::SemesterDetails;
use crate::schedule::{
    GroupMapper, ScheduleForGroup, ScheduleForRoom, ScheduleForTeacher, ScheduleFull, groups_in,
    partition_by_group, partition_by_room, partition_by_teacher, schedule_for_groups,
    schedule_for_rooms, schedule_for_teachers, schedule_full,
};

/// Read side of the timetable: loads a semester's assignments and composes
/// them into per-owner views, going through the cache first.
pub struct ScheduleViewService {
    db: SqlitePool,
    cache: Arc<dyn ScheduleCache>,
    mapper: Arc<dyn GroupMapper>,
}

impl ScheduleViewService {
    pub fn new(
        db: SqlitePool,
        cache: Arc<dyn ScheduleCache>,
        mapper: Arc<dyn GroupMapper>,
    ) -> Self {
        Self { db, cache, mapper }
    }

    pub async fn rooms(&self, semester_id: &str) -> Result<Vec<ScheduleForRoom>, AppError> {
        let key = CacheKey::new(ViewKind::Rooms, semester_id, None);
        self.cached(key, move || async move {
            let semester = self.semester(semester_id).await?;
            let rooms = rooms::fetch_rooms_ordered(&self.db).await?;
            let assignments =
                schedules::fetch_assignments_by_semester(&self.db, semester_id).await?;
            let by_room = partition_by_room(assignments);
            Ok::<_, AppError>(schedule_for_rooms(&rooms, &semester, &by_room, self.mapper.as_ref()))
        })
        .await
    }

    /// Views of the semester's groups, or of `group_id` alone. A semester
    /// without linked groups falls back to the groups it has lessons for.
    pub async fn groups(
        &self,
        semester_id: &str,
        group_id: Option<&str>,
    ) -> Result<Vec<ScheduleForGroup>, AppError> {
        let key = CacheKey::new(ViewKind::Groups, semester_id, group_id);
        self.cached(key, move || async move {
            let semester = self.semester(semester_id).await?;
            let assignments =
                schedules::fetch_assignments_by_semester(&self.db, semester_id).await?;

            let owners = match group_id {
                Some(id) => vec![
                    groups::find_group_by_id(&self.db, id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Group", id))?,
                ],
                None => {
                    let linked = groups::fetch_groups_by_semester(&self.db, semester_id).await?;
                    if linked.is_empty() { groups_in(&assignments) } else { linked }
                }
            };

            let by_group = partition_by_group(assignments);
            Ok::<_, AppError>(schedule_for_groups(
                &owners,
                &semester,
                &by_group,
                self.mapper.as_ref(),
            ))
        })
        .await
    }

    pub async fn teachers(
        &self,
        semester_id: &str,
        teacher_id: Option<&str>,
    ) -> Result<Vec<ScheduleForTeacher>, AppError> {
        let key = CacheKey::new(ViewKind::Teachers, semester_id, teacher_id);
        self.cached(key, move || async move {
            let semester = self.semester(semester_id).await?;

            let owners = match teacher_id {
                Some(id) => vec![
                    teachers::find_teacher_by_id(&self.db, id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Teacher", id))?,
                ],
                None => teachers::fetch_teachers_by_semester(&self.db, semester_id).await?,
            };

            let assignments =
                schedules::fetch_assignments_by_semester(&self.db, semester_id).await?;
            let by_teacher = partition_by_teacher(assignments);
            Ok::<_, AppError>(schedule_for_teachers(
                &owners,
                &semester,
                &by_teacher,
                self.mapper.as_ref(),
            ))
        })
        .await
    }

    pub async fn full(&self, semester_id: &str) -> Result<ScheduleFull, AppError> {
        let key = CacheKey::new(ViewKind::Full, semester_id, None);
        self.cached(key, move || async move {
            let semester = self.semester(semester_id).await?;
            let assignments =
                schedules::fetch_assignments_by_semester(&self.db, semester_id).await?;
            Ok::<_, AppError>(schedule_full(semester, assignments, self.mapper.as_ref()))
        })
        .await
    }

    async fn semester(&self, semester_id: &str) -> Result<SemesterDetails, AppError> {
        semesters::load_semester_details(&self.db, semester_id)
            .await?
            .ok_or_else(|| AppError::not_found("Semester", semester_id))
    }

    async fn cached<T, F, Fut>(&self, key: CacheKey, build: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(value) = self.cache.get(&key).await {
            match serde_json::from_value(value) {
                Ok(view) => return Ok(view),
                Err(e) => warn!("discarding unreadable cache entry {}: {}", key, e),
            }
        }

        debug!("composing view {}", key);
        let view = build().await?;
        match serde_json::to_value(&view) {
            Ok(value) => self.cache.put(key, value).await,
            Err(e) => warn!("view {} was not cached: {}", key, e),
        }
        Ok(view)
    }
}

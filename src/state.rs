use std::sync::Arc;

use sqlx::SqlitePool;

use crate::cache::ScheduleCache;
use crate::schedule::GroupMapper;
use crate::services::{ScheduleService, ScheduleViewService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub cache: Arc<dyn ScheduleCache>,
    pub mapper: Arc<dyn GroupMapper>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        cache: Arc<dyn ScheduleCache>,
        mapper: Arc<dyn GroupMapper>,
    ) -> Self {
        Self { db, cache, mapper }
    }

    pub fn schedule_service(&self) -> ScheduleService {
        ScheduleService::new(self.db.clone(), self.cache.clone())
    }

    pub fn view_service(&self) -> ScheduleViewService {
        ScheduleViewService::new(self.db.clone(), self.cache.clone(), self.mapper.clone())
    }
}

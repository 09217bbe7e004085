use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl PeriodRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_non_blank("Name", &self.name)?;
        if self.start_time >= self.end_time {
            return Err(AppError::BadRequest("Period must start before it ends".to_string()));
        }
        Ok(())
    }
}

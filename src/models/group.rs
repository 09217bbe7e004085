use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: String,
    pub title: String,
    pub sort_order: i64,
    pub disable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequest {
    pub title: String,
    /// Position in the ordered list; appended at the end when omitted.
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub disable: bool,
}

impl GroupRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_length("Title", &self.title, 2, 35)
    }
}

/// Lightweight reference embedded in lesson entries of schedule views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: String,
    pub title: String,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub disable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRequest {
    pub name: String,
    #[serde(default)]
    pub disable: bool,
}

impl SubjectRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_length("Name", &self.name, 2, 80)
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub disable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub disable: bool,
}

impl DepartmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_non_blank("Name", &self.name)
    }
}

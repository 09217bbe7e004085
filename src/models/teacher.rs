use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub position: String,
    pub email: Option<String>,
    pub department_id: Option<String>,
    pub disable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherRequest {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub position: String,
    pub email: Option<String>,
    pub department_id: Option<String>,
    #[serde(default)]
    pub disable: bool,
}

impl TeacherRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_length("Name", &self.name, 2, 35)?;
        super::require_length("Surname", &self.surname, 2, 35)?;
        super::require_length("Patronymic", &self.patronymic, 2, 35)?;
        super::require_length("Position", &self.position, 2, 35)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::BadRequest(
                    "Email must be a well-formed email address".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Name-only projection embedded in schedule views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherName {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
}

impl From<&Teacher> for TeacherName {
    fn from(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id.clone(),
            name: teacher.name.clone(),
            surname: teacher.surname.clone(),
            patronymic: teacher.patronymic.clone(),
        }
    }
}

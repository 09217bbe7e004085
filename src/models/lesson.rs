use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Lecture,
    Practical,
    Laboratory,
}

impl LessonType {
    pub const ALL: [LessonType; 3] = [
        LessonType::Lecture,
        LessonType::Practical,
        LessonType::Laboratory,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: String,
    pub hours: i32,
    pub link_to_meeting: Option<String>,
    pub subject_for_site: String,
    pub lesson_type: LessonType,
    pub grouped: bool,
    pub subject_id: String,
    pub teacher_id: String,
    pub group_id: String,
    pub semester_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    pub hours: i32,
    pub link_to_meeting: Option<String>,
    /// Display name; the subject's own name is used when blank.
    #[serde(default)]
    pub subject_for_site: String,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub grouped: bool,
    pub subject_id: String,
    pub teacher_id: String,
    pub group_id: String,
    pub semester_id: String,
}

impl LessonRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.hours < 1 {
            return Err(AppError::BadRequest("Hours must be at least 1".to_string()));
        }
        Ok(())
    }
}

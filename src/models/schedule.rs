use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{DayOfWeek, Group, LessonType, Period, RoomRef, TeacherName};

/// Week parity of a recurring slot. `Weekly` occupies both parities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvenOdd {
    Even,
    Odd,
    Weekly,
}

impl EvenOdd {
    pub fn is_even_week(self) -> bool {
        matches!(self, EvenOdd::Even | EvenOdd::Weekly)
    }

    pub fn is_odd_week(self) -> bool {
        matches!(self, EvenOdd::Odd | EvenOdd::Weekly)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: String,
    pub lesson_id: String,
    pub room_id: String,
    pub period_id: String,
    pub day_of_week: DayOfWeek,
    pub even_odd: EvenOdd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSaveRequest {
    pub lesson_id: String,
    pub room_id: String,
    pub period_id: String,
    pub day_of_week: DayOfWeek,
    pub even_odd: EvenOdd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoomRequest {
    pub room_id: String,
}

/// The lesson side of an assignment, already joined with its teacher and group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLesson {
    pub id: String,
    pub subject_for_site: String,
    pub lesson_type: LessonType,
    pub teacher: TeacherName,
    pub group: Group,
}

/// A fully resolved schedule row: one lesson occurrence placed into a room
/// on a day, week parity and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub id: String,
    pub day_of_week: DayOfWeek,
    pub even_odd: EvenOdd,
    pub period: Period,
    pub room: RoomRef,
    pub lesson: ScheduleLesson,
}

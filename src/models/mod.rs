pub mod department;
pub mod group;
pub mod lesson;
pub mod period;
pub mod room;
pub mod schedule;
pub mod semester;
pub mod subject;
pub mod teacher;

pub use department::{Department, DepartmentRequest};
pub use group::{Group, GroupRef, GroupRequest};
pub use lesson::{Lesson, LessonRequest, LessonType};
pub use period::{Period, PeriodRequest};
pub use room::{Room, RoomRef, RoomRequest, RoomType, RoomTypeRequest};
pub use schedule::{
    ChangeRoomRequest, EvenOdd, Schedule, ScheduleAssignment, ScheduleLesson, ScheduleSaveRequest,
};
pub use semester::{DayOfWeek, Semester, SemesterDetails, SemesterRequest};
pub use subject::{Subject, SubjectRequest};
pub use teacher::{Teacher, TeacherName, TeacherRequest};

use crate::error::AppError;

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} cannot be blank", field)));
    }
    Ok(())
}

pub(crate) fn require_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::BadRequest(format!(
            "{} must be between {} and {} characters long",
            field, min, max
        )));
    }
    Ok(())
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::{GroupRef, Period};

/// Ordering follows the calendar week, Monday first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Semester {
    pub id: String,
    pub description: String,
    pub year: i32,
    pub start_day: NaiveDate,
    pub end_day: NaiveDate,
    pub current_semester: bool,
    pub default_semester: bool,
    pub disable: bool,
}

/// Semester together with the grid it defines: the active days in week
/// order and the periods in start-time order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterDetails {
    #[serde(flatten)]
    pub semester: Semester,
    pub days_of_week: Vec<DayOfWeek>,
    pub periods: Vec<Period>,
    pub groups: Vec<GroupRef>,
}

impl SemesterDetails {
    pub fn id(&self) -> &str {
        &self.semester.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterRequest {
    pub description: String,
    pub year: i32,
    pub start_day: NaiveDate,
    pub end_day: NaiveDate,
    #[serde(default)]
    pub current_semester: bool,
    #[serde(default)]
    pub default_semester: bool,
    #[serde(default)]
    pub disable: bool,
    pub days_of_week: Vec<DayOfWeek>,
    pub period_ids: Vec<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl SemesterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require_non_blank("Description", &self.description)?;
        if self.start_day >= self.end_day {
            return Err(AppError::BadRequest("Semester must start before it ends".to_string()));
        }
        if self.days_of_week.is_empty() {
            return Err(AppError::BadRequest("Semester must have at least one day".to_string()));
        }
        if self.period_ids.is_empty() {
            return Err(AppError::BadRequest("Semester must have at least one period".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_ordering_follows_week() {
        let mut days = vec![DayOfWeek::Friday, DayOfWeek::Monday, DayOfWeek::Wednesday];
        days.sort();
        assert_eq!(days, vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday]);
    }

    #[test]
    fn test_day_serialization() {
        let json = serde_json::to_string(&DayOfWeek::Thursday).unwrap();
        assert_eq!(json, "\"THURSDAY\"");
        assert_eq!(DayOfWeek::Thursday.as_str(), "THURSDAY");
    }

    #[test]
    fn test_semester_request_validation() {
        let mut req = SemesterRequest {
            description: "1 semester".to_string(),
            year: 2026,
            start_day: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_day: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            current_semester: false,
            default_semester: false,
            disable: false,
            days_of_week: vec![DayOfWeek::Monday],
            period_ids: vec!["p1".to_string()],
            group_ids: Vec::new(),
        };
        assert!(req.validate().is_ok());

        req.end_day = req.start_day;
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }
}

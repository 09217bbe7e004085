use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use crate::db::{groups, lessons, periods, rooms, semesters, subjects, teachers};
use crate::models::{
    DayOfWeek, GroupRequest, Lesson, LessonRequest, LessonType, PeriodRequest, RoomRequest,
    RoomTypeRequest, SemesterRequest, SubjectRequest, TeacherRequest,
};

/// Ids of a minimal catalog: one semester on Monday and Tuesday with two
/// periods, two rooms, two groups, two teachers and one subject.
pub(crate) struct Catalog {
    pub semester_id: String,
    pub periods: Vec<String>,
    pub rooms: Vec<String>,
    pub groups: Vec<String>,
    pub teachers: Vec<String>,
    pub subject_id: String,
}

pub(crate) async fn seed_catalog(pool: &SqlitePool) -> Catalog {
    let mut period_ids = Vec::new();
    for (name, hour) in [("1", 8), ("2", 10)] {
        let period = periods::insert_period(pool, PeriodRequest {
            name: name.to_string(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time"),
            end_time: NaiveTime::from_hms_opt(hour + 1, 20, 0).expect("valid time"),
        })
        .await
        .expect("Failed to insert period");
        period_ids.push(period.id);
    }

    let room_type = rooms::insert_room_type(pool, RoomTypeRequest {
        description: "Lecture hall".to_string(),
    })
    .await
    .expect("Failed to insert room type");

    let mut room_ids = Vec::new();
    for name in ["R101", "R102"] {
        let room = rooms::insert_room(pool, RoomRequest {
            name: name.to_string(),
            room_type_id: room_type.id.clone(),
            sort_order: None,
            disable: false,
        })
        .await
        .expect("Failed to insert room");
        room_ids.push(room.id);
    }

    let mut group_ids = Vec::new();
    for title in ["G-11", "G-12"] {
        let group = groups::insert_group(pool, GroupRequest {
            title: title.to_string(),
            sort_order: None,
            disable: false,
        })
        .await
        .expect("Failed to insert group");
        group_ids.push(group.id);
    }

    let mut teacher_ids = Vec::new();
    for surname in ["Smith", "Jones"] {
        let teacher = teachers::insert_teacher(pool, TeacherRequest {
            name: "Anna".to_string(),
            surname: surname.to_string(),
            patronymic: "Ivanivna".to_string(),
            position: "Lecturer".to_string(),
            email: None,
            department_id: None,
            disable: false,
        })
        .await
        .expect("Failed to insert teacher");
        teacher_ids.push(teacher.id);
    }

    let subject = subjects::insert_subject(pool, SubjectRequest {
        name: "JS Frameworks".to_string(),
        disable: false,
    })
    .await
    .expect("Failed to insert subject");

    let semester = semesters::insert_semester(pool, SemesterRequest {
        description: "Autumn".to_string(),
        year: 2025,
        start_day: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
        end_day: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
        current_semester: true,
        default_semester: false,
        disable: false,
        days_of_week: vec![DayOfWeek::Tuesday, DayOfWeek::Monday],
        period_ids: period_ids.clone(),
        group_ids: group_ids.clone(),
    })
    .await
    .expect("Failed to insert semester");

    Catalog {
        semester_id: semester.id().to_string(),
        periods: period_ids,
        rooms: room_ids,
        groups: group_ids,
        teachers: teacher_ids,
        subject_id: subject.id,
    }
}

pub(crate) async fn seed_lesson(
    pool: &SqlitePool,
    catalog: &Catalog,
    teacher: usize,
    group: usize,
    grouped: bool,
) -> Lesson {
    lessons::insert_lesson(pool, LessonRequest {
        hours: 2,
        link_to_meeting: None,
        subject_for_site: "JS Frameworks".to_string(),
        lesson_type: LessonType::Lecture,
        grouped,
        subject_id: catalog.subject_id.clone(),
        teacher_id: catalog.teachers[teacher].clone(),
        group_id: catalog.groups[group].clone(),
        semester_id: catalog.semester_id.clone(),
    })
    .await
    .expect("Failed to insert lesson")
}

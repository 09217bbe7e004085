use chrono::NaiveTime;

use crate::models::{
    DayOfWeek, EvenOdd, Group, LessonType, Period, RoomRef, ScheduleAssignment, ScheduleLesson,
    TeacherName,
};

pub fn period(id: &str, name: &str, hour: u32) -> Period {
    Period {
        id: id.to_string(),
        name: name.to_string(),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(hour + 1, 20, 0).unwrap(),
    }
}

pub fn teacher_name(id: &str, surname: &str) -> TeacherName {
    TeacherName {
        id: id.to_string(),
        name: "John".to_string(),
        surname: surname.to_string(),
        patronymic: "Paul".to_string(),
    }
}

pub fn group(id: &str, title: &str, sort_order: i64) -> Group {
    Group {
        id: id.to_string(),
        title: title.to_string(),
        sort_order,
        disable: false,
    }
}

/// "JS Frameworks" lecture by Smith in period p1, room and group named
/// after their ids.
pub fn assignment(
    id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
    room_id: &str,
    group_id: &str,
) -> ScheduleAssignment {
    ScheduleAssignment {
        id: id.to_string(),
        day_of_week: day,
        even_odd,
        period: period("p1", "1", 8),
        room: RoomRef {
            id: room_id.to_string(),
            name: room_id.to_string(),
            room_type: "Lecture hall".to_string(),
        },
        lesson: ScheduleLesson {
            id: format!("lesson-{}", id),
            subject_for_site: "JS Frameworks".to_string(),
            lesson_type: LessonType::Lecture,
            teacher: teacher_name("t1", "Smith"),
            group: group(group_id, group_id, 1),
        },
    }
}

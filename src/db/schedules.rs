use chrono::NaiveTime;
use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::models::{
    DayOfWeek, EvenOdd, Group, LessonType, Period, RoomRef, Schedule, ScheduleAssignment,
    ScheduleLesson, TeacherName,
};

const SELECT_SCHEDULE: &str = r#"
    SELECT s.id, s.lesson_id, s.room_id, s.period_id, s.day_of_week, s.even_odd
    FROM schedules s
"#;

// Parity filter shared by the conflict queries: WEEKLY overlaps everything.
const PARITY_OVERLAP: &str = "(? = 'WEEKLY' OR s.even_odd = ? OR s.even_odd = 'WEEKLY')";

// Week order for `day_of_week`, which is stored as text.
const DAY_ORDER: &str = r#"
    CASE s.day_of_week
        WHEN 'MONDAY' THEN 1
        WHEN 'TUESDAY' THEN 2
        WHEN 'WEDNESDAY' THEN 3
        WHEN 'THURSDAY' THEN 4
        WHEN 'FRIDAY' THEN 5
        WHEN 'SATURDAY' THEN 6
        WHEN 'SUNDAY' THEN 7
    END
"#;

/// Flat join row behind [`ScheduleAssignment`].
#[derive(Debug, FromRow)]
struct ScheduleRecord {
    id: String,
    day_of_week: DayOfWeek,
    even_odd: EvenOdd,
    period_id: String,
    period_name: String,
    period_start: NaiveTime,
    period_end: NaiveTime,
    room_id: String,
    room_name: String,
    room_type: String,
    lesson_id: String,
    subject_for_site: String,
    lesson_type: LessonType,
    teacher_id: String,
    teacher_name: String,
    teacher_surname: String,
    teacher_patronymic: String,
    group_id: String,
    group_title: String,
    group_sort_order: i64,
    group_disable: bool,
}

impl From<ScheduleRecord> for ScheduleAssignment {
    fn from(r: ScheduleRecord) -> Self {
        ScheduleAssignment {
            id: r.id,
            day_of_week: r.day_of_week,
            even_odd: r.even_odd,
            period: Period {
                id: r.period_id,
                name: r.period_name,
                start_time: r.period_start,
                end_time: r.period_end,
            },
            room: RoomRef {
                id: r.room_id,
                name: r.room_name,
                room_type: r.room_type,
            },
            lesson: ScheduleLesson {
                id: r.lesson_id,
                subject_for_site: r.subject_for_site,
                lesson_type: r.lesson_type,
                teacher: TeacherName {
                    id: r.teacher_id,
                    name: r.teacher_name,
                    surname: r.teacher_surname,
                    patronymic: r.teacher_patronymic,
                },
                group: Group {
                    id: r.group_id,
                    title: r.group_title,
                    sort_order: r.group_sort_order,
                    disable: r.group_disable,
                },
            },
        }
    }
}

/// Every assignment of the semester, fully joined. Rows come back in a
/// stable order so collapsed group lists are deterministic.
pub async fn fetch_assignments_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<Vec<ScheduleAssignment>, sqlx::Error> {
    let records = sqlx::query_as::<_, ScheduleRecord>(
        r#"
        SELECT
            s.id, s.day_of_week, s.even_odd,
            p.id AS period_id, p.name AS period_name,
            p.start_time AS period_start, p.end_time AS period_end,
            r.id AS room_id, r.name AS room_name, rt.description AS room_type,
            l.id AS lesson_id, l.subject_for_site, l.lesson_type,
            t.id AS teacher_id, t.name AS teacher_name,
            t.surname AS teacher_surname, t.patronymic AS teacher_patronymic,
            g.id AS group_id, g.title AS group_title,
            g.sort_order AS group_sort_order, g.disable AS group_disable
        FROM schedules s
        JOIN lessons l ON l.id = s.lesson_id
        JOIN periods p ON p.id = s.period_id
        JOIN rooms r ON r.id = s.room_id
        JOIN room_types rt ON rt.id = r.room_type_id
        JOIN teachers t ON t.id = l.teacher_id
        JOIN student_groups g ON g.id = l.group_id
        WHERE l.semester_id = ?
        ORDER BY p.start_time, r.sort_order, g.sort_order, s.id
        "#,
    )
    .bind(semester_id)
    .fetch_all(db)
    .await?;

    Ok(records.into_iter().map(ScheduleAssignment::from).collect())
}

pub async fn fetch_schedules(db: &SqlitePool) -> Result<Vec<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!(
        "{} JOIN periods p ON p.id = s.period_id ORDER BY {}, p.start_time",
        SELECT_SCHEDULE, DAY_ORDER
    ))
    .fetch_all(db)
    .await
}

pub async fn fetch_schedules_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<Vec<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!(
        "{} JOIN lessons l ON l.id = s.lesson_id JOIN periods p ON p.id = s.period_id \
         WHERE l.semester_id = ? ORDER BY {}, p.start_time",
        SELECT_SCHEDULE, DAY_ORDER
    ))
    .bind(semester_id)
    .fetch_all(db)
    .await
}

pub async fn find_schedule_by_id<'e, E>(db: E, id: &str) -> Result<Option<Schedule>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Schedule>(&format!("{} WHERE s.id = ?", SELECT_SCHEDULE))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Assignments of any of `lesson_ids` sitting in exactly this slot.
pub async fn fetch_schedules_in_slot(
    db: &SqlitePool,
    lesson_ids: &[String],
    day: DayOfWeek,
    even_odd: EvenOdd,
    period_id: &str,
) -> Result<Vec<Schedule>, sqlx::Error> {
    if lesson_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; lesson_ids.len()].join(", ");
    let sql = format!(
        "{} WHERE s.lesson_id IN ({}) AND s.day_of_week = ? AND s.even_odd = ? AND s.period_id = ?",
        SELECT_SCHEDULE, placeholders
    );

    let mut query = sqlx::query_as::<_, Schedule>(&sql);
    for lesson_id in lesson_ids {
        query = query.bind(lesson_id);
    }
    query
        .bind(day)
        .bind(even_odd)
        .bind(period_id)
        .fetch_all(db)
        .await
}

pub async fn insert_schedule<'e, E>(
    db: E,
    lesson_id: &str,
    room_id: &str,
    period_id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
) -> Result<Schedule, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO schedules (id, lesson_id, room_id, period_id, day_of_week, even_odd)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(lesson_id)
    .bind(room_id)
    .bind(period_id)
    .bind(day)
    .bind(even_odd)
    .execute(db)
    .await?;

    Ok(Schedule {
        id,
        lesson_id: lesson_id.to_string(),
        room_id: room_id.to_string(),
        period_id: period_id.to_string(),
        day_of_week: day,
        even_odd,
    })
}

pub async fn update_schedule_room<'e, E>(
    db: E,
    id: &str,
    room_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE schedules SET room_id = ? WHERE id = ?")
        .bind(room_id)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_schedule<'e, E>(db: E, id: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_schedules_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM schedules WHERE lesson_id IN (SELECT id FROM lessons WHERE semester_id = ?)"
    )
    .bind(semester_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Assignments of the group's lessons that collide with the slot.
pub async fn count_group_conflicts<'e, E>(
    db: E,
    semester_id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
    period_id: &str,
    group_id: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*)
        FROM schedules s
        JOIN lessons l ON l.id = s.lesson_id
        WHERE l.semester_id = ?
          AND s.day_of_week = ?
          AND s.period_id = ?
          AND {}
          AND l.group_id = ?
        "#,
        PARITY_OVERLAP
    ))
    .bind(semester_id)
    .bind(day)
    .bind(period_id)
    .bind(even_odd)
    .bind(even_odd)
    .bind(group_id)
    .fetch_one(db)
    .await
}

/// Assignments of the teacher's lessons that collide with the slot.
pub async fn count_teacher_conflicts(
    db: &SqlitePool,
    semester_id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
    period_id: &str,
    teacher_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*)
        FROM schedules s
        JOIN lessons l ON l.id = s.lesson_id
        WHERE l.semester_id = ?
          AND s.day_of_week = ?
          AND s.period_id = ?
          AND {}
          AND l.teacher_id = ?
        "#,
        PARITY_OVERLAP
    ))
    .bind(semester_id)
    .bind(day)
    .bind(period_id)
    .bind(even_odd)
    .bind(even_odd)
    .bind(teacher_id)
    .fetch_one(db)
    .await
}

pub async fn count_lesson_in_slot<'e, E>(
    db: E,
    lesson_id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
    period_id: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*)
        FROM schedules s
        WHERE s.lesson_id = ?
          AND s.day_of_week = ?
          AND s.period_id = ?
          AND {}
        "#,
        PARITY_OVERLAP
    ))
    .bind(lesson_id)
    .bind(day)
    .bind(period_id)
    .bind(even_odd)
    .bind(even_odd)
    .fetch_one(db)
    .await
}

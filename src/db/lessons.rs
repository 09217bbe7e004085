use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Lesson, LessonRequest};

const SELECT_LESSON: &str = r#"
    SELECT id, hours, link_to_meeting, subject_for_site, lesson_type, grouped,
           subject_id, teacher_id, group_id, semester_id
    FROM lessons
"#;

pub async fn fetch_lessons(db: &SqlitePool) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("{} ORDER BY subject_for_site", SELECT_LESSON))
        .fetch_all(db)
        .await
}

pub async fn fetch_lessons_by_group(
    db: &SqlitePool,
    group_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "{} WHERE group_id = ? ORDER BY subject_for_site",
        SELECT_LESSON
    ))
    .bind(group_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_lessons_by_teacher(
    db: &SqlitePool,
    teacher_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "{} WHERE teacher_id = ? ORDER BY subject_for_site",
        SELECT_LESSON
    ))
    .bind(teacher_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_lessons_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "{} WHERE semester_id = ? ORDER BY subject_for_site",
        SELECT_LESSON
    ))
    .bind(semester_id)
    .fetch_all(db)
    .await
}

pub async fn find_lesson_by_id(db: &SqlitePool, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!("{} WHERE id = ?", SELECT_LESSON))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Lessons taught together with `lesson`: same semester, subject, teacher
/// and type, all flagged as grouped. Includes `lesson` itself.
pub async fn fetch_grouped_lessons(
    db: &SqlitePool,
    lesson: &Lesson,
) -> Result<Vec<Lesson>, sqlx::Error> {
    if !lesson.grouped {
        return Ok(vec![lesson.clone()]);
    }

    sqlx::query_as::<_, Lesson>(&format!(
        r#"{}
        WHERE semester_id = ?
          AND subject_id = ?
          AND teacher_id = ?
          AND lesson_type = ?
          AND grouped = 1
        ORDER BY id
        "#,
        SELECT_LESSON
    ))
    .bind(&lesson.semester_id)
    .bind(&lesson.subject_id)
    .bind(&lesson.teacher_id)
    .bind(lesson.lesson_type)
    .fetch_all(db)
    .await
}

/// `subject_for_site` must already be resolved by the caller.
pub async fn insert_lesson(db: &SqlitePool, req: LessonRequest) -> Result<Lesson, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO lessons
            (id, hours, link_to_meeting, subject_for_site, lesson_type, grouped,
             subject_id, teacher_id, group_id, semester_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.hours)
    .bind(&req.link_to_meeting)
    .bind(&req.subject_for_site)
    .bind(req.lesson_type)
    .bind(req.grouped)
    .bind(&req.subject_id)
    .bind(&req.teacher_id)
    .bind(&req.group_id)
    .bind(&req.semester_id)
    .execute(db)
    .await?;

    Ok(Lesson {
        id,
        hours: req.hours,
        link_to_meeting: req.link_to_meeting,
        subject_for_site: req.subject_for_site,
        lesson_type: req.lesson_type,
        grouped: req.grouped,
        subject_id: req.subject_id,
        teacher_id: req.teacher_id,
        group_id: req.group_id,
        semester_id: req.semester_id,
    })
}

/// Updates the lesson. When it stays grouped, its siblings follow the
/// shared fields (everything but the group) in the same transaction.
pub async fn update_lesson(
    db: &SqlitePool,
    id: &str,
    req: LessonRequest,
) -> Result<Option<Lesson>, sqlx::Error> {
    let Some(existing) = find_lesson_by_id(db, id).await? else {
        return Ok(None);
    };

    let siblings: Vec<String> = if existing.grouped && req.grouped {
        fetch_grouped_lessons(db, &existing)
            .await?
            .into_iter()
            .map(|lesson| lesson.id)
            .filter(|sibling_id| sibling_id != id)
            .collect()
    } else {
        Vec::new()
    };

    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        UPDATE lessons
        SET hours = ?,
            link_to_meeting = ?,
            subject_for_site = ?,
            lesson_type = ?,
            grouped = ?,
            subject_id = ?,
            teacher_id = ?,
            group_id = ?,
            semester_id = ?
        WHERE id = ?
        "#,
    )
    .bind(req.hours)
    .bind(&req.link_to_meeting)
    .bind(&req.subject_for_site)
    .bind(req.lesson_type)
    .bind(req.grouped)
    .bind(&req.subject_id)
    .bind(&req.teacher_id)
    .bind(&req.group_id)
    .bind(&req.semester_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    for sibling_id in &siblings {
        sqlx::query(
            r#"
            UPDATE lessons
            SET hours = ?,
                link_to_meeting = ?,
                subject_for_site = ?,
                lesson_type = ?,
                subject_id = ?,
                teacher_id = ?
            WHERE id = ?
            "#,
        )
        .bind(req.hours)
        .bind(&req.link_to_meeting)
        .bind(&req.subject_for_site)
        .bind(req.lesson_type)
        .bind(&req.subject_id)
        .bind(&req.teacher_id)
        .bind(sibling_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    find_lesson_by_id(db, id).await
}

/// Deletes the lesson, or the whole group of lessons when it is grouped.
/// Returns the number of removed rows.
pub async fn delete_lesson(db: &SqlitePool, id: &str) -> Result<u64, sqlx::Error> {
    let Some(lesson) = find_lesson_by_id(db, id).await? else {
        return Ok(0);
    };
    let targets = fetch_grouped_lessons(db, &lesson).await?;

    let mut tx = db.begin().await?;
    let mut removed = 0;
    for target in &targets {
        removed += sqlx::query("DELETE FROM lessons WHERE id = ?")
            .bind(&target.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    Ok(removed)
}

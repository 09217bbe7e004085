use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Teacher, TeacherRequest};

const SELECT_TEACHER: &str =
    "SELECT id, name, surname, patronymic, position, email, department_id, disable FROM teachers";

pub async fn fetch_teachers(db: &SqlitePool, disabled: bool) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "{} WHERE disable = ? ORDER BY surname, name",
        SELECT_TEACHER
    ))
    .bind(disabled)
    .fetch_all(db)
    .await
}

pub async fn fetch_teachers_by_department(
    db: &SqlitePool,
    department_id: &str,
) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "{} WHERE department_id = ? AND disable = 0 ORDER BY surname, name",
        SELECT_TEACHER
    ))
    .bind(department_id)
    .fetch_all(db)
    .await
}

/// Teachers holding at least one lesson in the semester.
pub async fn fetch_teachers_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "{} WHERE id IN (SELECT teacher_id FROM lessons WHERE semester_id = ?) \
         ORDER BY surname, name",
        SELECT_TEACHER
    ))
    .bind(semester_id)
    .fetch_all(db)
    .await
}

pub async fn find_teacher_by_id(db: &SqlitePool, id: &str) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("{} WHERE id = ?", SELECT_TEACHER))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_teacher(db: &SqlitePool, req: TeacherRequest) -> Result<Teacher, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO teachers
            (id, name, surname, patronymic, position, email, department_id, disable)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.surname)
    .bind(&req.patronymic)
    .bind(&req.position)
    .bind(&req.email)
    .bind(&req.department_id)
    .bind(req.disable)
    .execute(db)
    .await?;

    Ok(Teacher {
        id,
        name: req.name,
        surname: req.surname,
        patronymic: req.patronymic,
        position: req.position,
        email: req.email,
        department_id: req.department_id,
        disable: req.disable,
    })
}

pub async fn update_teacher(
    db: &SqlitePool,
    id: &str,
    req: TeacherRequest,
) -> Result<Option<Teacher>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE teachers
        SET name = ?,
            surname = ?,
            patronymic = ?,
            position = ?,
            email = ?,
            department_id = ?,
            disable = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.surname)
    .bind(&req.patronymic)
    .bind(&req.position)
    .bind(&req.email)
    .bind(&req.department_id)
    .bind(req.disable)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_teacher_by_id(db, id).await
}

pub async fn delete_teacher(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

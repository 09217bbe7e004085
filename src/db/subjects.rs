use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Subject, SubjectRequest};

pub async fn fetch_subjects(db: &SqlitePool, disabled: bool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "SELECT id, name, disable FROM subjects WHERE disable = ? ORDER BY name",
    )
    .bind(disabled)
    .fetch_all(db)
    .await
}

pub async fn find_subject_by_id(db: &SqlitePool, id: &str) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>("SELECT id, name, disable FROM subjects WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_subject(db: &SqlitePool, req: SubjectRequest) -> Result<Subject, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO subjects (id, name, disable) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .bind(req.disable)
        .execute(db)
        .await?;

    Ok(Subject {
        id,
        name: req.name.trim().to_string(),
        disable: req.disable,
    })
}

pub async fn update_subject(
    db: &SqlitePool,
    id: &str,
    req: SubjectRequest,
) -> Result<Option<Subject>, sqlx::Error> {
    let result = sqlx::query("UPDATE subjects SET name = ?, disable = ? WHERE id = ?")
        .bind(req.name.trim())
        .bind(req.disable)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_subject_by_id(db, id).await
}

pub async fn delete_subject(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Department, DepartmentRequest};

pub async fn fetch_departments(
    db: &SqlitePool,
    disabled: bool,
) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(
        "SELECT id, name, disable FROM departments WHERE disable = ? ORDER BY name"
    )
    .bind(disabled)
    .fetch_all(db)
    .await
}

pub async fn find_department_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>("SELECT id, name, disable FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_department(
    db: &SqlitePool,
    req: DepartmentRequest,
) -> Result<Department, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO departments (id, name, disable) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .bind(req.disable)
        .execute(db)
        .await?;

    Ok(Department {
        id,
        name: req.name.trim().to_string(),
        disable: req.disable,
    })
}

pub async fn update_department(
    db: &SqlitePool,
    id: &str,
    req: DepartmentRequest,
) -> Result<Option<Department>, sqlx::Error> {
    let result = sqlx::query("UPDATE departments SET name = ?, disable = ? WHERE id = ?")
        .bind(req.name.trim())
        .bind(req.disable)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_department_by_id(db, id).await
}

pub async fn delete_department(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

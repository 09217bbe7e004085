use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Group, GroupRequest};

const SELECT_GROUP: &str = "SELECT id, title, sort_order, disable FROM student_groups";

pub async fn fetch_groups(db: &SqlitePool, disabled: bool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&format!("{} WHERE disable = ? ORDER BY title", SELECT_GROUP))
        .bind(disabled)
        .fetch_all(db)
        .await
}

pub async fn fetch_groups_ordered(db: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&format!(
        "{} WHERE disable = 0 ORDER BY sort_order, title",
        SELECT_GROUP
    ))
    .fetch_all(db)
    .await
}

pub async fn fetch_groups_by_semester(
    db: &SqlitePool,
    semester_id: &str,
) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT g.id, g.title, g.sort_order, g.disable
        FROM student_groups g
        JOIN semester_groups sg ON sg.group_id = g.id
        WHERE sg.semester_id = ?
        ORDER BY g.sort_order, g.title
        "#,
    )
    .bind(semester_id)
    .fetch_all(db)
    .await
}

pub async fn find_group_by_id(db: &SqlitePool, id: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&format!("{} WHERE id = ?", SELECT_GROUP))
        .bind(id)
        .fetch_optional(db)
        .await
}

async fn next_sort_order(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(sort_order), 0) + 1 FROM student_groups")
        .fetch_one(db)
        .await
}

pub async fn insert_group(db: &SqlitePool, req: GroupRequest) -> Result<Group, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let sort_order = match req.sort_order {
        Some(order) => order,
        None => next_sort_order(db).await?,
    };

    sqlx::query("INSERT INTO student_groups (id, title, sort_order, disable) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(req.title.trim())
        .bind(sort_order)
        .bind(req.disable)
        .execute(db)
        .await?;

    Ok(Group {
        id,
        title: req.title.trim().to_string(),
        sort_order,
        disable: req.disable,
    })
}

pub async fn update_group(
    db: &SqlitePool,
    id: &str,
    req: GroupRequest,
) -> Result<Option<Group>, sqlx::Error> {
    let Some(current) = find_group_by_id(db, id).await? else {
        return Ok(None);
    };
    let sort_order = req.sort_order.unwrap_or(current.sort_order);

    sqlx::query("UPDATE student_groups SET title = ?, sort_order = ?, disable = ? WHERE id = ?")
        .bind(req.title.trim())
        .bind(sort_order)
        .bind(req.disable)
        .bind(id)
        .execute(db)
        .await?;

    find_group_by_id(db, id).await
}

pub async fn delete_group(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM student_groups WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

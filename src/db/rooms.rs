use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{DayOfWeek, EvenOdd, Room, RoomRequest, RoomType, RoomTypeRequest};

const SELECT_ROOM: &str = r#"
    SELECT r.id, r.name, r.room_type_id, t.description AS room_type, r.sort_order, r.disable
    FROM rooms r
    JOIN room_types t ON t.id = r.room_type_id
"#;

pub async fn fetch_room_types(db: &SqlitePool) -> Result<Vec<RoomType>, sqlx::Error> {
    sqlx::query_as::<_, RoomType>("SELECT id, description FROM room_types ORDER BY description")
        .fetch_all(db)
        .await
}

pub async fn find_room_type_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<RoomType>, sqlx::Error> {
    sqlx::query_as::<_, RoomType>("SELECT id, description FROM room_types WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_room_type(
    db: &SqlitePool,
    req: RoomTypeRequest,
) -> Result<RoomType, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO room_types (id, description) VALUES (?, ?)")
        .bind(&id)
        .bind(req.description.trim())
        .execute(db)
        .await?;

    Ok(RoomType {
        id,
        description: req.description.trim().to_string(),
    })
}

pub async fn update_room_type(
    db: &SqlitePool,
    id: &str,
    req: RoomTypeRequest,
) -> Result<Option<RoomType>, sqlx::Error> {
    let result = sqlx::query("UPDATE room_types SET description = ? WHERE id = ?")
        .bind(req.description.trim())
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_room_type_by_id(db, id).await
}

pub async fn delete_room_type(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM room_types WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_rooms(db: &SqlitePool, disabled: bool) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(&format!("{} WHERE r.disable = ? ORDER BY r.name", SELECT_ROOM))
        .bind(disabled)
        .fetch_all(db)
        .await
}

pub async fn fetch_rooms_ordered(db: &SqlitePool) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(&format!(
        "{} WHERE r.disable = 0 ORDER BY r.sort_order, r.name",
        SELECT_ROOM
    ))
    .fetch_all(db)
    .await
}

/// Rooms with no assignment in the slot for any overlapping week parity.
pub async fn fetch_available_rooms(
    db: &SqlitePool,
    semester_id: &str,
    day: DayOfWeek,
    even_odd: EvenOdd,
    period_id: &str,
) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(&format!(
        r#"{}
        WHERE r.disable = 0
          AND r.id NOT IN (
            SELECT s.room_id
            FROM schedules s
            JOIN lessons l ON l.id = s.lesson_id
            WHERE l.semester_id = ?
              AND s.day_of_week = ?
              AND s.period_id = ?
              AND (? = 'WEEKLY' OR s.even_odd = ? OR s.even_odd = 'WEEKLY')
          )
        ORDER BY r.sort_order, r.name
        "#,
        SELECT_ROOM
    ))
    .bind(semester_id)
    .bind(day)
    .bind(period_id)
    .bind(even_odd)
    .bind(even_odd)
    .fetch_all(db)
    .await
}

pub async fn find_room_by_id(db: &SqlitePool, id: &str) -> Result<Option<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(&format!("{} WHERE r.id = ?", SELECT_ROOM))
        .bind(id)
        .fetch_optional(db)
        .await
}

async fn next_sort_order(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(sort_order), 0) + 1 FROM rooms")
        .fetch_one(db)
        .await
}

pub async fn insert_room(db: &SqlitePool, req: RoomRequest) -> Result<Room, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let sort_order = match req.sort_order {
        Some(order) => order,
        None => next_sort_order(db).await?,
    };

    sqlx::query(
        "INSERT INTO rooms (id, name, room_type_id, sort_order, disable) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(&req.room_type_id)
    .bind(sort_order)
    .bind(req.disable)
    .execute(db)
    .await?;

    find_room_by_id(db, &id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_room(
    db: &SqlitePool,
    id: &str,
    req: RoomRequest,
) -> Result<Option<Room>, sqlx::Error> {
    let Some(current) = find_room_by_id(db, id).await? else {
        return Ok(None);
    };
    let sort_order = req.sort_order.unwrap_or(current.sort_order);

    sqlx::query(
        "UPDATE rooms SET name = ?, room_type_id = ?, sort_order = ?, disable = ? WHERE id = ?",
    )
    .bind(req.name.trim())
    .bind(&req.room_type_id)
    .bind(sort_order)
    .bind(req.disable)
    .bind(id)
    .execute(db)
    .await?;

    find_room_by_id(db, id).await
}

pub async fn delete_room(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Period, PeriodRequest};

pub async fn fetch_periods(db: &SqlitePool) -> Result<Vec<Period>, sqlx::Error> {
    sqlx::query_as::<_, Period>(
        "SELECT id, name, start_time, end_time FROM periods ORDER BY start_time",
    )
    .fetch_all(db)
    .await
}

pub async fn find_period_by_id(db: &SqlitePool, id: &str) -> Result<Option<Period>, sqlx::Error> {
    sqlx::query_as::<_, Period>("SELECT id, name, start_time, end_time FROM periods WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_period(db: &SqlitePool, req: PeriodRequest) -> Result<Period, sqlx::Error> {
    let mut created = insert_periods(db, vec![req]).await?;
    created.pop().ok_or(sqlx::Error::RowNotFound)
}

/// All-or-nothing bulk insert.
pub async fn insert_periods(
    db: &SqlitePool,
    reqs: Vec<PeriodRequest>,
) -> Result<Vec<Period>, sqlx::Error> {
    let mut tx = db.begin().await?;
    let mut created = Vec::with_capacity(reqs.len());

    for req in reqs {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO periods (id, name, start_time, end_time) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(req.name.trim())
            .bind(req.start_time)
            .bind(req.end_time)
            .execute(&mut *tx)
            .await?;

        created.push(Period {
            id,
            name: req.name.trim().to_string(),
            start_time: req.start_time,
            end_time: req.end_time,
        });
    }

    tx.commit().await?;
    Ok(created)
}

pub async fn update_period(
    db: &SqlitePool,
    id: &str,
    req: PeriodRequest,
) -> Result<Option<Period>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE periods SET name = ?, start_time = ?, end_time = ? WHERE id = ?",
    )
    .bind(req.name.trim())
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_period_by_id(db, id).await
}

pub async fn delete_period(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM periods WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::db::setup_test_db;

    fn request(name: &str, hour: u32) -> PeriodRequest {
        PeriodRequest {
            name: name.to_string(),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 20, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_periods_are_ordered_by_start() {
        let pool = setup_test_db().await;

        insert_periods(&pool, vec![request("3", 12), request("1", 8), request("2", 10)])
            .await
            .expect("Failed to insert periods");

        let names: Vec<String> = fetch_periods(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_time_round_trips() {
        let pool = setup_test_db().await;
        let period = insert_period(&pool, request("1", 8)).await.unwrap();

        let loaded = find_period_by_id(&pool, &period.id).await.unwrap().expect("Period not found");
        assert_eq!(loaded, period);
    }
}

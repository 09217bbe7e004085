use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db::groups::fetch_groups_by_semester;
use crate::models::{DayOfWeek, GroupRef, Period, Semester, SemesterDetails, SemesterRequest};

const SELECT_SEMESTER: &str = r#"
    SELECT id, description, year, start_day, end_day, current_semester, default_semester, disable
    FROM semesters
"#;

pub async fn fetch_semesters(
    db: &SqlitePool,
    disabled: bool,
) -> Result<Vec<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!(
        "{} WHERE disable = ? ORDER BY year DESC, start_day DESC",
        SELECT_SEMESTER
    ))
    .bind(disabled)
    .fetch_all(db)
    .await
}

pub async fn find_semester_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!("{} WHERE id = ?", SELECT_SEMESTER))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_current_semester(db: &SqlitePool) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!("{} WHERE current_semester = 1", SELECT_SEMESTER))
        .fetch_optional(db)
        .await
}

pub async fn find_default_semester(db: &SqlitePool) -> Result<Option<Semester>, sqlx::Error> {
    sqlx::query_as::<_, Semester>(&format!("{} WHERE default_semester = 1", SELECT_SEMESTER))
        .fetch_optional(db)
        .await
}

/// Loads the semester with its days in week order and its periods in
/// start-time order.
pub async fn load_semester_details(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<SemesterDetails>, sqlx::Error> {
    let Some(semester) = find_semester_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut days_of_week = sqlx::query_scalar::<_, DayOfWeek>(
        "SELECT day_of_week FROM semester_days WHERE semester_id = ?"
    )
    .bind(id)
    .fetch_all(db)
    .await?;
    days_of_week.sort();

    let periods = sqlx::query_as::<_, Period>(
        r#"
        SELECT p.id, p.name, p.start_time, p.end_time
        FROM periods p
        JOIN semester_periods sp ON sp.period_id = p.id
        WHERE sp.semester_id = ?
        ORDER BY p.start_time
        "#,
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    let groups = fetch_groups_by_semester(db, id)
        .await?
        .into_iter()
        .map(|g| GroupRef { id: g.id, title: g.title })
        .collect();

    Ok(Some(SemesterDetails {
        semester,
        days_of_week,
        periods,
        groups,
    }))
}

async fn replace_links(
    conn: &mut SqliteConnection,
    id: &str,
    req: &SemesterRequest,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM semester_days WHERE semester_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM semester_periods WHERE semester_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM semester_groups WHERE semester_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    for day in &req.days_of_week {
        sqlx::query("INSERT OR IGNORE INTO semester_days (semester_id, day_of_week) VALUES (?, ?)")
            .bind(id)
            .bind(*day)
            .execute(&mut *conn)
            .await?;
    }
    for period_id in &req.period_ids {
        sqlx::query("INSERT OR IGNORE INTO semester_periods (semester_id, period_id) VALUES (?, ?)")
            .bind(id)
            .bind(period_id)
            .execute(&mut *conn)
            .await?;
    }
    for group_id in &req.group_ids {
        sqlx::query("INSERT OR IGNORE INTO semester_groups (semester_id, group_id) VALUES (?, ?)")
            .bind(id)
            .bind(group_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn clear_flags(
    conn: &mut SqliteConnection,
    current: bool,
    default: bool,
) -> Result<(), sqlx::Error> {
    if current {
        sqlx::query("UPDATE semesters SET current_semester = 0")
            .execute(&mut *conn)
            .await?;
    }
    if default {
        sqlx::query("UPDATE semesters SET default_semester = 0")
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn insert_semester(
    db: &SqlitePool,
    req: SemesterRequest,
) -> Result<SemesterDetails, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let mut tx = db.begin().await?;

    clear_flags(&mut tx, req.current_semester, req.default_semester).await?;

    sqlx::query(
        r#"
        INSERT INTO semesters
            (id, description, year, start_day, end_day, current_semester, default_semester, disable)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.description.trim())
    .bind(req.year)
    .bind(req.start_day)
    .bind(req.end_day)
    .bind(req.current_semester)
    .bind(req.default_semester)
    .bind(req.disable)
    .execute(&mut *tx)
    .await?;

    replace_links(&mut tx, &id, &req).await?;
    tx.commit().await?;

    load_semester_details(db, &id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_semester(
    db: &SqlitePool,
    id: &str,
    req: SemesterRequest,
) -> Result<Option<SemesterDetails>, sqlx::Error> {
    let mut tx = db.begin().await?;

    clear_flags(&mut tx, req.current_semester, req.default_semester).await?;

    let result = sqlx::query(
        r#"
        UPDATE semesters
        SET description = ?,
            year = ?,
            start_day = ?,
            end_day = ?,
            current_semester = ?,
            default_semester = ?,
            disable = ?
        WHERE id = ?
        "#,
    )
    .bind(req.description.trim())
    .bind(req.year)
    .bind(req.start_day)
    .bind(req.end_day)
    .bind(req.current_semester)
    .bind(req.default_semester)
    .bind(req.disable)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if result == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    replace_links(&mut tx, id, &req).await?;
    tx.commit().await?;

    load_semester_details(db, id).await
}

/// Makes `id` the only current semester. Returns false when it does not exist.
pub async fn set_current_semester(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    set_flag(db, id, "current_semester").await
}

/// Makes `id` the only default semester. Returns false when it does not exist.
pub async fn set_default_semester(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    set_flag(db, id, "default_semester").await
}

async fn set_flag(db: &SqlitePool, id: &str, column: &'static str) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(&format!("UPDATE semesters SET {column} = (id = ?)"))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM semesters WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if result.rows_affected() == 0 || exists == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

pub async fn add_groups_to_semester(
    db: &SqlitePool,
    id: &str,
    group_ids: &[String],
) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    for group_id in group_ids {
        sqlx::query("INSERT OR IGNORE INTO semester_groups (semester_id, group_id) VALUES (?, ?)")
            .bind(id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

pub async fn delete_semester(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM semesters WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::db::groups::insert_group;
    use crate::db::periods::insert_periods;
    use crate::db::setup_test_db;
    use crate::models::{GroupRequest, PeriodRequest};

    async fn seed_periods(pool: &SqlitePool) -> Vec<Period> {
        insert_periods(pool, vec![
            PeriodRequest {
                name: "2".to_string(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 20, 0).unwrap(),
            },
            PeriodRequest {
                name: "1".to_string(),
                start_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 50, 0).unwrap(),
            },
        ])
        .await
        .expect("Failed to insert periods")
    }

    fn request(description: &str, period_ids: Vec<String>, current: bool) -> SemesterRequest {
        SemesterRequest {
            description: description.to_string(),
            year: 2026,
            start_day: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_day: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            current_semester: current,
            default_semester: false,
            disable: false,
            days_of_week: vec![DayOfWeek::Wednesday, DayOfWeek::Monday, DayOfWeek::Monday],
            period_ids,
            group_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_details_are_ordered() {
        let pool = setup_test_db().await;
        let periods = seed_periods(&pool).await;
        let ids = periods.iter().map(|p| p.id.clone()).collect();

        let details = insert_semester(&pool, request("1 semester", ids, false))
            .await
            .expect("Failed to insert semester");

        assert_eq!(details.days_of_week, vec![DayOfWeek::Monday, DayOfWeek::Wednesday]);
        let names: Vec<&str> = details.periods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_only_one_current_semester() {
        let pool = setup_test_db().await;
        let periods = seed_periods(&pool).await;
        let ids: Vec<String> = periods.iter().map(|p| p.id.clone()).collect();

        let first = insert_semester(&pool, request("1 semester", ids.clone(), true)).await.unwrap();
        let second = insert_semester(&pool, request("2 semester", ids, true)).await.unwrap();

        let current = find_current_semester(&pool).await.unwrap().expect("No current semester");
        assert_eq!(current.id, second.semester.id);

        assert!(set_current_semester(&pool, first.id()).await.unwrap());
        let current = find_current_semester(&pool).await.unwrap().expect("No current semester");
        assert_eq!(current.id, first.semester.id);

        assert!(!set_current_semester(&pool, "missing").await.unwrap());
        assert!(find_current_semester(&pool).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_groups() {
        let pool = setup_test_db().await;
        let periods = seed_periods(&pool).await;
        let ids = periods.iter().map(|p| p.id.clone()).collect();
        let semester = insert_semester(&pool, request("1 semester", ids, false)).await.unwrap();

        let group = insert_group(&pool, GroupRequest {
            title: "311-B".to_string(),
            sort_order: None,
            disable: false,
        })
        .await
        .unwrap();

        add_groups_to_semester(&pool, semester.id(), &[group.id.clone(), group.id.clone()])
            .await
            .expect("Failed to add groups");

        let details = load_semester_details(&pool, semester.id()).await.unwrap().unwrap();
        assert_eq!(details.groups, vec![GroupRef { id: group.id, title: group.title }]);
    }
}

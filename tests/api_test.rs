use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use timetable::api::router;
use timetable::cache::NoopScheduleCache;
use timetable::db;
use timetable::schedule::DefaultGroupMapper;
use timetable::state::AppState;
use tower::ServiceExt;

async fn setup_app() -> Router {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create database");
    router(AppState::new(pool, Arc::new(NoopScheduleCache), Arc::new(DefaultGroupMapper)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {} failed: {}", uri, value);
    value
}

fn id(value: &Value) -> String {
    value["id"].as_str().expect("id missing").to_string()
}

struct Seeded {
    semester_id: String,
    period_id: String,
    rooms: Vec<String>,
    group_id: String,
    lesson_id: String,
    other_lesson_id: String,
}

// Semester on MONDAY with a single period "1", rooms R101 and R102,
// group 311-B with two lessons by different teachers.
async fn seed(app: &Router) -> Seeded {
    let period = create(app, "/periods", json!({
        "name": "1",
        "start_time": "08:00:00",
        "end_time": "09:20:00"
    }))
    .await;

    let room_type = create(app, "/room-types", json!({"description": "Lecture hall"})).await;
    let mut rooms = Vec::new();
    for name in ["R101", "R102"] {
        let room = create(app, "/rooms", json!({
            "name": name,
            "room_type_id": id(&room_type),
            "sort_order": null
        }))
        .await;
        rooms.push(id(&room));
    }

    let group = create(app, "/groups", json!({"title": "311-B", "sort_order": null})).await;

    let mut teachers = Vec::new();
    for surname in ["Smith", "Jones"] {
        let teacher = create(app, "/teachers", json!({
            "name": "John",
            "surname": surname,
            "patronymic": "Paul",
            "position": "Lecturer",
            "email": null,
            "department_id": null
        }))
        .await;
        teachers.push(id(&teacher));
    }

    let subject = create(app, "/subjects", json!({"name": "JS Frameworks"})).await;

    let semester = create(app, "/semesters", json!({
        "description": "Autumn",
        "year": 2025,
        "start_day": "2025-09-01",
        "end_day": "2025-12-31",
        "current_semester": true,
        "days_of_week": ["MONDAY"],
        "period_ids": [id(&period)],
        "group_ids": [id(&group)]
    }))
    .await;

    let mut lessons = Vec::new();
    for teacher_id in &teachers {
        let lesson = create(app, "/lessons", json!({
            "hours": 2,
            "link_to_meeting": null,
            "lesson_type": "LECTURE",
            "subject_id": id(&subject),
            "teacher_id": teacher_id,
            "group_id": id(&group),
            "semester_id": id(&semester)
        }))
        .await;
        lessons.push(id(&lesson));
    }

    Seeded {
        semester_id: id(&semester),
        period_id: id(&period),
        rooms,
        group_id: id(&group),
        lesson_id: lessons[0].clone(),
        other_lesson_id: lessons[1].clone(),
    }
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_room_views_are_dense() {
    let app = setup_app().await;
    let seeded = seed(&app).await;

    create(&app, "/schedules", json!({
        "lesson_id": seeded.lesson_id,
        "room_id": seeded.rooms[0],
        "period_id": seeded.period_id,
        "day_of_week": "MONDAY",
        "even_odd": "EVEN"
    }))
    .await;

    let uri = format!("/schedules/full/rooms?semester_id={}", seeded.semester_id);
    let (status, views) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let views = views.as_array().expect("array of room views");
    assert_eq!(views.len(), 2);

    let r101 = &views[0];
    assert_eq!(r101["room_name"], "R101");
    let days = r101["schedules"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["day"], "MONDAY");

    let even = days[0]["even"].as_array().unwrap();
    assert_eq!(even.len(), 1);
    assert_eq!(even[0]["class_name"], "1");
    let lessons = even[0]["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0]["subject_name"], "JS Frameworks");
    assert_eq!(lessons[0]["teacher"]["surname"], "Smith");
    assert_eq!(lessons[0]["groups"][0]["title"], "311-B");
    assert!(lessons[0].get("room").is_none());

    let odd = days[0]["odd"].as_array().unwrap();
    assert_eq!(odd.len(), 1);
    assert!(odd[0]["lessons"].as_array().unwrap().is_empty());

    let r102 = &views[1];
    assert_eq!(r102["room_name"], "R102");
    let days = r102["schedules"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    for parity in ["even", "odd"] {
        let slots = days[0][parity].as_array().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0]["class_name"], "1");
        assert!(slots[0]["lessons"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_group_conflict_is_rejected() {
    let app = setup_app().await;
    let seeded = seed(&app).await;

    create(&app, "/schedules", json!({
        "lesson_id": seeded.lesson_id,
        "room_id": seeded.rooms[0],
        "period_id": seeded.period_id,
        "day_of_week": "MONDAY",
        "even_odd": "WEEKLY"
    }))
    .await;

    let (status, body) = send(&app, Method::POST, "/schedules", Some(json!({
        "lesson_id": seeded.other_lesson_id,
        "room_id": seeded.rooms[1],
        "period_id": seeded.period_id,
        "day_of_week": "MONDAY",
        "even_odd": "ODD"
    })))
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "409 Conflict");

    let uri = format!(
        "/schedules/data-before?semester_id={}&day_of_week=MONDAY&even_odd=EVEN\
         &period_id={}&lesson_id={}",
        seeded.semester_id, seeded.period_id, seeded.other_lesson_id
    );
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_group_view_includes_rooms_and_delete_clears_it() {
    let app = setup_app().await;
    let seeded = seed(&app).await;

    let saved = create(&app, "/schedules", json!({
        "lesson_id": seeded.lesson_id,
        "room_id": seeded.rooms[1],
        "period_id": seeded.period_id,
        "day_of_week": "MONDAY",
        "even_odd": "ODD"
    }))
    .await;
    let schedule_id = saved[0]["id"].as_str().unwrap().to_string();

    let uri = format!(
        "/schedules/full/groups?semester_id={}&group_id={}",
        seeded.semester_id, seeded.group_id
    );
    let (status, views) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let odd = &views[0]["days"][0]["odd"][0]["lessons"];
    assert_eq!(odd[0]["room"]["name"], "R102");

    let (status, _) =
        send(&app, Method::DELETE, &format!("/schedules/{}", schedule_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, views) = send(&app, Method::GET, &uri, None).await;
    assert!(views[0]["days"][0]["odd"][0]["lessons"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_errors_map_to_status_codes() {
    let app = setup_app().await;

    let (status, _) =
        send(&app, Method::GET, "/schedules/full/rooms?semester_id=missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/groups",
        Some(json!({"title": "A", "sort_order": null})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "400 Bad Request");

    create(&app, "/subjects", json!({"name": "Algebra"})).await;
    let (status, _) = send(&app, Method::POST, "/subjects", Some(json!({"name": "Algebra"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/teachers/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lesson_defaults_subject_for_site_and_lists_types() {
    let app = setup_app().await;
    let seeded = seed(&app).await;

    let (status, lesson) =
        send(&app, Method::GET, &format!("/lessons/{}", seeded.lesson_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lesson["subject_for_site"], "JS Frameworks");

    let (_, types) = send(&app, Method::GET, "/lessons/types", None).await;
    assert_eq!(types, json!(["LECTURE", "PRACTICAL", "LABORATORY"]));

    let (_, current) = send(&app, Method::GET, "/semesters/current", None).await;
    assert_eq!(current["id"], seeded.semester_id.as_str());
}

//! Integration tests: schedule CRUD, auth, validation, availability, workload, audit.

use admit_api::server::{self, AppState};
use admit_store::InMemoryScheduleStore;
use admit_types::InterviewerSummary;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

const TOKEN: &str = "Bearer staff-token";

async fn test_app() -> axum::Router {
    let store = Arc::new(InMemoryScheduleStore::new());
    for (id, first) in [(1, "Ada"), (2, "Bo")] {
        store
            .upsert_interviewer(InterviewerSummary {
                id,
                first_name: first.to_string(),
                last_name: "Tester".to_string(),
                role: "TEACHER".to_string(),
                subject: Some("Math".to_string()),
                level: None,
            })
            .await;
    }
    server::router(Arc::new(AppState::new(store)))
}

async fn call(app: &axum::Router, method: &str, uri: &str, auth: bool, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if auth {
        req = req.header("authorization", TOKEN);
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn recurring(interviewer: i64, day: &str, start: &str, end: &str) -> Value {
    json!({
        "interviewerId": interviewer,
        "dayOfWeek": day,
        "startTime": start,
        "endTime": end,
        "scheduleType": "RECURRING",
        "year": 2026
    })
}

#[tokio::test]
async fn create_update_deactivate_delete() {
    let app = test_app().await;
    let (status, created) = call(
        &app,
        "POST",
        "/api/interviewer-schedules",
        true,
        Some(recurring(1, "MONDAY", "09:00", "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["startTime"], "09:00:00");
    assert_eq!(created["isActive"], true);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/api/interviewer-schedules/{}", id),
        true,
        Some(json!({ "endTime": "11:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["endTime"], "11:00:00");
    assert_eq!(updated["dayOfWeek"], "MONDAY");

    let (status, deactivated) = call(
        &app,
        "PUT",
        &format!("/api/interviewer-schedules/{}/deactivate", id),
        true,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deactivated["isActive"], false);

    let (status, _) = call(&app, "DELETE", &format!("/api/interviewer-schedules/{}", id), true, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, "DELETE", &format!("/api/interviewer-schedules/{}", id), true, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let app = test_app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/interviewer-schedules",
        false,
        Some(recurring(1, "MONDAY", "09:00", "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, "GET", "/api/interviewer-schedules/interviewer/1", false, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/api/interviewer-schedules/audit", false, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_records_are_rejected_with_message() {
    let app = test_app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/interviewer-schedules",
        true,
        Some(recurring(1, "MONDAY", "10:00", "09:00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = call(
        &app,
        "POST",
        "/api/interviewer-schedules",
        true,
        Some(json!({
            "interviewerId": 1,
            "startTime": "09:00",
            "endTime": "09:30",
            "scheduleType": "RECURRING",
            "year": 2026
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "GET",
        "/api/interviews/availability/interviewers?date=2026-10-12&time=9am",
        true,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn listing_by_interviewer_and_year() {
    let app = test_app().await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(1, "MONDAY", "09:00", "09:30"))).await;
    let mut other_year = recurring(1, "TUESDAY", "09:00", "09:30");
    other_year["year"] = json!(2025);
    call(&app, "POST", "/api/interviewer-schedules", true, Some(other_year)).await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(2, "MONDAY", "09:00", "09:30"))).await;

    let (_, all) = call(&app, "GET", "/api/interviewer-schedules/interviewer/1", true, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    let (_, year) = call(&app, "GET", "/api/interviewer-schedules/interviewer/1/year/2026", true, None).await;
    let year = year.as_array().unwrap();
    assert_eq!(year.len(), 1);
    assert_eq!(year[0]["dayOfWeek"], "MONDAY");

    let (_, with) = call(&app, "GET", "/api/interviewer-schedules/interviewers-with-schedules/2025", true, None).await;
    let with = with.as_array().unwrap();
    assert_eq!(with.len(), 1);
    assert_eq!(with[0]["firstName"], "Ada");
}

#[tokio::test]
async fn availability_search_and_summary() {
    let app = test_app().await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(1, "MONDAY", "09:00", "11:00"))).await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(2, "MONDAY", "10:00", "11:00"))).await;
    call(
        &app,
        "POST",
        "/api/interviewer-schedules",
        true,
        Some(json!({
            "interviewerId": 1,
            "specificDate": "2026-10-12",
            "startTime": "10:00",
            "endTime": "10:30",
            "scheduleType": "EXCEPTION",
            "year": 2026
        })),
    )
    .await;

    let (status, list) = call(
        &app,
        "GET",
        "/api/interviews/availability/interviewers?date=2026-10-12&time=10:00",
        true,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = list.as_array().unwrap().iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![2]);

    let (status, list) = call(
        &app,
        "GET",
        "/api/interviews/public/interviewers?date=2026-10-12&time=09:30",
        false,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, list) = call(
        &app,
        "GET",
        "/api/interviews/public/interviewers?date=2026-10-13&time=09:30",
        false,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let (status, summary) = call(&app, "GET", "/api/interviews/availability/summary?date=2026-10-12", true, None).await;
    assert_eq!(status, StatusCode::OK);
    let slots = summary["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 18);
    let at = |time: &str| {
        slots
            .iter()
            .find(|s| s["time"] == time)
            .map(|s| s["availableCount"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(at("09:00:00"), 1);
    assert_eq!(at("10:00:00"), 1);
    assert_eq!(at("10:30:00"), 2);
    assert_eq!(at("16:30:00"), 0);
}

#[tokio::test]
async fn workload_rows_and_audit_trail() {
    let app = test_app().await;
    let (_, a) = call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(1, "MONDAY", "09:00", "11:00"))).await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(1, "FRIDAY", "13:00", "14:00"))).await;
    call(&app, "POST", "/api/interviewer-schedules", true, Some(recurring(2, "MONDAY", "09:00", "09:30"))).await;
    let id = a["id"].as_i64().unwrap();
    call(&app, "DELETE", &format!("/api/interviewer-schedules/{}", id), true, None).await;

    let (status, rows) = call(&app, "GET", "/api/interviewer-schedules/statistics/workload/2026", true, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["interviewerId"], 1);
    assert_eq!(rows[0]["scheduleCount"], 1);
    assert_eq!(rows[0]["totalMinutes"], 60);
    assert_eq!(rows[1]["lastName"], "Tester");

    let (status, events) = call(&app, "GET", "/api/interviewer-schedules/audit?limit=2", true, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["kind"], "delete");
    assert_eq!(events[0]["scheduleId"], id);
    assert_eq!(events[1]["kind"], "create");

    let (_, filtered) = call(&app, "GET", "/api/interviewer-schedules/audit?interviewerId=2", true, None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health() {
    let app = test_app().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

//! Axum server and routes.

use crate::error::ApiError;
use admit_store::InMemoryScheduleStore;
use admit_types::{
    AuditEvent, AuditListOptions, AvailabilityService, AvailabilitySummary, Credentials,
    InterviewerSummary, NewSchedule, ScheduleRecord, ScheduleService, ScheduleUpdate, SlotTime,
    WorkloadRow,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub store: Arc<InMemoryScheduleStore>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryScheduleStore>) -> Self {
        Self { store }
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    let schedules = Router::new()
        .route("/", post(handle_create))
        .route("/audit", get(handle_audit_list))
        .route("/:id", put(handle_update).delete(handle_delete))
        .route("/:id/deactivate", put(handle_deactivate))
        .route("/interviewer/:id", get(handle_for_interviewer))
        .route("/interviewer/:id/year/:year", get(handle_for_year))
        .route("/statistics/workload/:year", get(handle_workload))
        .route(
            "/interviewers-with-schedules/:year",
            get(handle_interviewers_with_schedules),
        );
    let interviews = Router::new()
        .route("/availability/interviewers", get(handle_available))
        .route("/availability/summary", get(handle_summary))
        .route("/public/interviewers", get(handle_public_available));

    Router::new()
        .nest("/api/interviewer-schedules", schedules)
        .nest("/api/interviews", interviews)
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `Authorization: Bearer <token>`. Anything else yields empty credentials, which
/// the store rejects as unauthorized.
fn credentials(headers: &HeaderMap) -> Credentials {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");
    Credentials::bearer(token.trim())
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub time: SlotTime,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

async fn handle_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<NewSchedule>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ScheduleRecord>)> {
    let auth = credentials(&headers);
    let Json(schedule) = body?;
    let record = state.store.create_schedule(&auth, &schedule).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn handle_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ScheduleUpdate>, JsonRejection>,
) -> ApiResult<Json<ScheduleRecord>> {
    let auth = credentials(&headers);
    let Path(id) = id?;
    let Json(update) = body?;
    Ok(Json(state.store.update_schedule(&auth, id, &update).await?))
}

async fn handle_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let auth = credentials(&headers);
    let Path(id) = id?;
    state.store.delete_schedule(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_deactivate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ScheduleRecord>> {
    let auth = credentials(&headers);
    let Path(id) = id?;
    Ok(Json(state.store.deactivate_schedule(&auth, id).await?))
}

async fn handle_for_interviewer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<ScheduleRecord>>> {
    let auth = credentials(&headers);
    let Path(interviewer_id) = id?;
    Ok(Json(
        state
            .store
            .schedules_for_interviewer(&auth, interviewer_id)
            .await?,
    ))
}

async fn handle_for_year(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: Result<Path<(i64, i32)>, PathRejection>,
) -> ApiResult<Json<Vec<ScheduleRecord>>> {
    let auth = credentials(&headers);
    let Path((interviewer_id, year)) = params?;
    Ok(Json(
        state
            .store
            .schedules_for_year(&auth, interviewer_id, year)
            .await?,
    ))
}

async fn handle_workload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    year: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<WorkloadRow>>> {
    let auth = credentials(&headers);
    let Path(year) = year?;
    Ok(Json(state.store.workload_statistics(&auth, year).await?))
}

async fn handle_interviewers_with_schedules(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    year: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<InterviewerSummary>>> {
    let auth = credentials(&headers);
    let Path(year) = year?;
    Ok(Json(
        state.store.interviewers_with_schedules(&auth, year).await?,
    ))
}

async fn handle_audit_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<AuditListOptions>, QueryRejection>,
) -> ApiResult<Json<Vec<AuditEvent>>> {
    if !credentials(&headers).is_present() {
        return Err(ApiError::unauthorized());
    }
    let Query(opts) = query?;
    Ok(Json(state.store.audit_events(&opts).await))
}

async fn handle_available(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InterviewerSummary>>> {
    let auth = credentials(&headers);
    let Query(q) = query?;
    Ok(Json(
        state
            .store
            .available_interviewers(&auth, q.date, q.time)
            .await?,
    ))
}

async fn handle_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<AvailabilitySummary>> {
    let auth = credentials(&headers);
    let Query(q) = query?;
    Ok(Json(state.store.availability_summary(&auth, q.date).await?))
}

async fn handle_public_available(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InterviewerSummary>>> {
    let Query(q) = query?;
    Ok(Json(
        state
            .store
            .public_available_interviewers(q.date, q.time)
            .await?,
    ))
}

async fn handle_health() -> &'static str {
    "ok"
}

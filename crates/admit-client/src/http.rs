//! reqwest-backed implementation of the schedule and availability services.

use crate::config::{ClientConfig, ConfigError};
use admit_types::{
    AvailabilityService, AvailabilitySummary, Credentials, ErrorBody, InterviewerSummary,
    NewSchedule, ScheduleRecord, ScheduleService, ScheduleUpdate, ServiceError, SlotTime,
    WorkloadRow,
};
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

const SCHEDULES: &str = "/interviewer-schedules";

/// Client for the admissions REST API. Authenticated calls attach
/// `Authorization: Bearer <token>` from the [`Credentials`] passed in; the public
/// availability search sends no credentials.
pub struct AdmissionsClient {
    client: reqwest::Client,
    base_url: String,
}

impl AdmissionsClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, auth: Option<&Credentials>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, authenticated = auth.is_some(), "api request");
        let req = self.client.request(method, url);
        match auth {
            Some(a) => req.bearer_auth(a.token()),
            None => req,
        }
    }

    async fn send(req: RequestBuilder) -> Result<String, ServiceError> {
        let res = req
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !status.is_success() {
            let err = error_from_response(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ServiceError> {
        let body = Self::send(req).await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl fmt::Debug for AdmissionsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Maps a non-2xx response to a [`ServiceError`], keeping the body's `message` when present.
fn error_from_response(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    if status == StatusCode::UNAUTHORIZED {
        return ServiceError::Unauthorized { message };
    }
    ServiceError::Backend {
        status: status.as_u16(),
        message,
    }
}

fn slot_query(date: NaiveDate, time: SlotTime) -> [(&'static str, String); 2] {
    [("date", date.to_string()), ("time", time.to_string())]
}

#[async_trait::async_trait]
impl ScheduleService for AdmissionsClient {
    async fn create_schedule(
        &self,
        auth: &Credentials,
        schedule: &NewSchedule,
    ) -> Result<ScheduleRecord, ServiceError> {
        let req = self.request(Method::POST, SCHEDULES, Some(auth)).json(schedule);
        Self::send_json(req).await
    }

    async fn update_schedule(
        &self,
        auth: &Credentials,
        id: i64,
        update: &ScheduleUpdate,
    ) -> Result<ScheduleRecord, ServiceError> {
        let path = format!("{}/{}", SCHEDULES, id);
        let req = self.request(Method::PUT, &path, Some(auth)).json(update);
        Self::send_json(req).await
    }

    async fn delete_schedule(&self, auth: &Credentials, id: i64) -> Result<(), ServiceError> {
        let path = format!("{}/{}", SCHEDULES, id);
        Self::send(self.request(Method::DELETE, &path, Some(auth))).await?;
        Ok(())
    }

    async fn deactivate_schedule(
        &self,
        auth: &Credentials,
        id: i64,
    ) -> Result<ScheduleRecord, ServiceError> {
        let path = format!("{}/{}/deactivate", SCHEDULES, id);
        Self::send_json(self.request(Method::PUT, &path, Some(auth))).await
    }

    async fn schedules_for_interviewer(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        let path = format!("{}/interviewer/{}", SCHEDULES, interviewer_id);
        Self::send_json(self.request(Method::GET, &path, Some(auth))).await
    }

    async fn schedules_for_year(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
        year: i32,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        let path = format!("{}/interviewer/{}/year/{}", SCHEDULES, interviewer_id, year);
        Self::send_json(self.request(Method::GET, &path, Some(auth))).await
    }

    async fn workload_statistics(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<WorkloadRow>, ServiceError> {
        let path = format!("{}/statistics/workload/{}", SCHEDULES, year);
        Self::send_json(self.request(Method::GET, &path, Some(auth))).await
    }

    async fn interviewers_with_schedules(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        let path = format!("{}/interviewers-with-schedules/{}", SCHEDULES, year);
        Self::send_json(self.request(Method::GET, &path, Some(auth))).await
    }
}

#[async_trait::async_trait]
impl AvailabilityService for AdmissionsClient {
    async fn available_interviewers(
        &self,
        auth: &Credentials,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        let req = self
            .request(Method::GET, "/interviews/availability/interviewers", Some(auth))
            .query(&slot_query(date, time));
        Self::send_json(req).await
    }

    async fn availability_summary(
        &self,
        auth: &Credentials,
        date: NaiveDate,
    ) -> Result<AvailabilitySummary, ServiceError> {
        let req = self
            .request(Method::GET, "/interviews/availability/summary", Some(auth))
            .query(&[("date", date.to_string())]);
        Self::send_json(req).await
    }

    async fn public_available_interviewers(
        &self,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        let req = self
            .request(Method::GET, "/interviews/public/interviewers", None)
            .query(&slot_query(date, time));
        Self::send_json(req).await
    }
}

//! Service traits for the scheduling and availability endpoints, plus the shared error type.

use crate::{
    AvailabilitySummary, InterviewerSummary, NewSchedule, ScheduleRecord, ScheduleUpdate,
    ScheduleValidationError, SlotTime, WorkloadRow,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Bearer credentials passed explicitly into every authenticated call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// An empty or whitespace-only token is treated as no credentials.
    pub fn is_present(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Interviewer schedule CRUD and read-side aggregates (`/interviewer-schedules`).
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Create a record; the returned record carries its backend id.
    async fn create_schedule(
        &self,
        auth: &Credentials,
        schedule: &NewSchedule,
    ) -> Result<ScheduleRecord, ServiceError>;

    /// Partial update of an existing record.
    async fn update_schedule(
        &self,
        auth: &Credentials,
        id: i64,
        update: &ScheduleUpdate,
    ) -> Result<ScheduleRecord, ServiceError>;

    /// Permanent delete.
    async fn delete_schedule(&self, auth: &Credentials, id: i64) -> Result<(), ServiceError>;

    /// Soft delete (`isActive = false`).
    async fn deactivate_schedule(
        &self,
        auth: &Credentials,
        id: i64,
    ) -> Result<ScheduleRecord, ServiceError>;

    /// All records of an interviewer, across years.
    async fn schedules_for_interviewer(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
    ) -> Result<Vec<ScheduleRecord>, ServiceError>;

    /// Records of an interviewer scoped to one scheduling year.
    async fn schedules_for_year(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
        year: i32,
    ) -> Result<Vec<ScheduleRecord>, ServiceError>;

    /// Workload tuples for every interviewer with schedules in `year`.
    async fn workload_statistics(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<WorkloadRow>, ServiceError>;

    /// Interviewers having at least one record in `year`.
    async fn interviewers_with_schedules(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<InterviewerSummary>, ServiceError>;
}

/// Availability search over interviewers (`/interviews/...`).
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Interviewers free at `(date, time)`. An empty list is a valid answer.
    async fn available_interviewers(
        &self,
        auth: &Credentials,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError>;

    /// Per-slot availability counts for `date`.
    async fn availability_summary(
        &self,
        auth: &Credentials,
        date: NaiveDate,
    ) -> Result<AvailabilitySummary, ServiceError>;

    /// Unauthenticated variant of [`AvailabilityService::available_interviewers`].
    async fn public_available_interviewers(
        &self,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError>;
}

#[async_trait]
impl<T: ScheduleService + ?Sized> ScheduleService for Arc<T> {
    async fn create_schedule(
        &self,
        auth: &Credentials,
        schedule: &NewSchedule,
    ) -> Result<ScheduleRecord, ServiceError> {
        (**self).create_schedule(auth, schedule).await
    }

    async fn update_schedule(
        &self,
        auth: &Credentials,
        id: i64,
        update: &ScheduleUpdate,
    ) -> Result<ScheduleRecord, ServiceError> {
        (**self).update_schedule(auth, id, update).await
    }

    async fn delete_schedule(&self, auth: &Credentials, id: i64) -> Result<(), ServiceError> {
        (**self).delete_schedule(auth, id).await
    }

    async fn deactivate_schedule(
        &self,
        auth: &Credentials,
        id: i64,
    ) -> Result<ScheduleRecord, ServiceError> {
        (**self).deactivate_schedule(auth, id).await
    }

    async fn schedules_for_interviewer(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        (**self).schedules_for_interviewer(auth, interviewer_id).await
    }

    async fn schedules_for_year(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
        year: i32,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        (**self).schedules_for_year(auth, interviewer_id, year).await
    }

    async fn workload_statistics(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<WorkloadRow>, ServiceError> {
        (**self).workload_statistics(auth, year).await
    }

    async fn interviewers_with_schedules(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        (**self).interviewers_with_schedules(auth, year).await
    }
}

#[async_trait]
impl<T: AvailabilityService + ?Sized> AvailabilityService for Arc<T> {
    async fn available_interviewers(
        &self,
        auth: &Credentials,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        (**self).available_interviewers(auth, date, time).await
    }

    async fn availability_summary(
        &self,
        auth: &Credentials,
        date: NaiveDate,
    ) -> Result<AvailabilitySummary, ServiceError> {
        (**self).availability_summary(auth, date).await
    }

    async fn public_available_interviewers(
        &self,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        (**self).public_available_interviewers(date, time).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend error {status}: {}", display_message(.message))]
    Backend { status: u16, message: Option<String> },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {}", display_message(.message))]
    Unauthorized { message: Option<String> },
}

fn display_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no message")
}

impl ServiceError {
    /// Message for the user: the backend's own message when it sent one, else `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            ServiceError::Backend {
                message: Some(m), ..
            }
            | ServiceError::Unauthorized { message: Some(m) }
                if !m.trim().is_empty() =>
            {
                m.clone()
            }
            ServiceError::Validation(m) | ServiceError::NotFound(m) if !m.trim().is_empty() => {
                m.clone()
            }
            _ => default.to_string(),
        }
    }

    /// The target does not exist, whether reported by the store or as an HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound(_) | ServiceError::Backend { status: 404, .. }
        )
    }
}

impl From<ScheduleValidationError> for ServiceError {
    fn from(e: ScheduleValidationError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

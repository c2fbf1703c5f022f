//! HTTP client for the admissions scheduling API (`/api/interviewer-schedules`, `/api/interviews`).

mod config;
mod http;

pub use admit_types::{AvailabilityService, Credentials, ScheduleService, ServiceError};
pub use config::{ClientConfig, ConfigError};
pub use http::AdmissionsClient;

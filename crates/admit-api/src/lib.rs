//! Development backend for the admissions interviewer-schedule API.

pub mod error;
pub mod server;

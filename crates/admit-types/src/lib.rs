//! Core types and traits for the admissions interviewer-scheduling API.
//!
//! Entity and DTO shapes match the backend's JSON (camelCase keys, upper-case enum names).

mod audit;
mod dto;
pub mod messages;
mod time;
mod traits;

pub use audit::*;
pub use dto::*;
pub use time::*;
pub use traits::*;

//! In-memory backend for the interviewer-schedule API.

mod availability;
mod memory;
mod seed;
mod workload;

pub use admit_types::{AvailabilityService, ScheduleService, ServiceError};
pub use availability::{available_at, business_slots};
pub use memory::InMemoryScheduleStore;
pub use seed::{Seed, SeedError};
pub use workload::workload_rows;

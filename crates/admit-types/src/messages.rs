//! Default user-facing messages, used when the backend sends none.

pub const LOAD_SCHEDULES_FAILED: &str = "Failed to load schedules.";
pub const SAVE_SCHEDULES_FAILED: &str = "Failed to save schedules.";
pub const LOAD_AVAILABILITY_FAILED: &str = "Failed to load available interviewers.";
pub const LOAD_SUMMARY_FAILED: &str = "Failed to load availability summary.";
pub const LOAD_STATISTICS_FAILED: &str = "Failed to load workload statistics.";

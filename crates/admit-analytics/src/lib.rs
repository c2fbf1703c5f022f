//! Workload analytics over the statistics endpoint's per-interviewer rows.

mod level;
mod report;

pub use level::WorkloadLevel;
pub use report::{load_workload_report, InterviewerWorkload, LevelCounts, WorkloadReport};

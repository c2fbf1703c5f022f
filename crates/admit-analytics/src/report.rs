//! WorkloadReport: a pure aggregation of [`WorkloadRow`]s.

use crate::level::WorkloadLevel;
use admit_types::{Credentials, ScheduleService, ServiceError, WorkloadRow};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewerWorkload {
    pub interviewer_id: i64,
    pub name: String,
    pub schedule_count: u64,
    pub total_minutes: u64,
    pub hours: f64,
    /// Percentage of the grand total, `0.0` when the total is zero.
    pub share_percent: f64,
    pub level: WorkloadLevel,
}

/// Interviewers per workload level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    pub unconfigured: usize,
    pub low: usize,
    pub normal: usize,
    pub high: usize,
    pub overload: usize,
}

impl LevelCounts {
    fn bump(&mut self, level: WorkloadLevel) {
        let slot = match level {
            WorkloadLevel::Unconfigured => &mut self.unconfigured,
            WorkloadLevel::Low => &mut self.low,
            WorkloadLevel::Normal => &mut self.normal,
            WorkloadLevel::High => &mut self.high,
            WorkloadLevel::Overload => &mut self.overload,
        };
        *slot += 1;
    }

    pub fn get(&self, level: WorkloadLevel) -> usize {
        match level {
            WorkloadLevel::Unconfigured => self.unconfigured,
            WorkloadLevel::Low => self.low,
            WorkloadLevel::Normal => self.normal,
            WorkloadLevel::High => self.high,
            WorkloadLevel::Overload => self.overload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub year: i32,
    pub total_interviewers: usize,
    pub total_schedules: u64,
    pub total_minutes: u64,
    pub total_hours: f64,
    /// Mean minutes per interviewer, `0.0` for an empty report.
    pub average_minutes: f64,
    pub levels: LevelCounts,
    /// Heaviest first; ties by interviewer id.
    pub rows: Vec<InterviewerWorkload>,
}

impl WorkloadReport {
    pub fn from_rows(year: i32, rows: &[WorkloadRow]) -> Self {
        let total_schedules = rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.schedule_count));
        let total_minutes = rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.total_minutes));

        let mut levels = LevelCounts::default();
        let mut out: Vec<InterviewerWorkload> = rows
            .iter()
            .map(|r| {
                let level = WorkloadLevel::classify(r.total_minutes);
                levels.bump(level);
                InterviewerWorkload {
                    interviewer_id: r.interviewer_id,
                    name: format!("{} {}", r.first_name, r.last_name).trim().to_string(),
                    schedule_count: r.schedule_count,
                    total_minutes: r.total_minutes,
                    hours: minutes_to_hours(r.total_minutes),
                    share_percent: share(r.total_minutes, total_minutes),
                    level,
                }
            })
            .collect();
        out.sort_by(|a, b| {
            b.total_minutes
                .cmp(&a.total_minutes)
                .then(a.interviewer_id.cmp(&b.interviewer_id))
        });

        let average_minutes = if rows.is_empty() {
            0.0
        } else {
            total_minutes as f64 / rows.len() as f64
        };

        Self {
            year,
            total_interviewers: rows.len(),
            total_schedules,
            total_minutes,
            total_hours: minutes_to_hours(total_minutes),
            average_minutes,
            levels,
            rows: out,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, interviewer_id: i64) -> Option<&InterviewerWorkload> {
        self.rows.iter().find(|r| r.interviewer_id == interviewer_id)
    }
}

fn minutes_to_hours(minutes: u64) -> f64 {
    minutes as f64 / 60.0
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Fetches the year's workload rows and aggregates them. Errors are passed through
/// unchanged; callers pick the message with
/// [`ServiceError::user_message`] and `messages::LOAD_STATISTICS_FAILED`.
pub async fn load_workload_report<S>(
    service: &S,
    auth: &Credentials,
    year: i32,
) -> Result<WorkloadReport, ServiceError>
where
    S: ScheduleService + ?Sized,
{
    let rows = service.workload_statistics(auth, year).await?;
    let report = WorkloadReport::from_rows(year, &rows);
    tracing::debug!(
        year,
        interviewers = report.total_interviewers,
        total_minutes = report.total_minutes,
        "workload report built"
    );
    Ok(report)
}

//! Schedule entities and request/response DTOs for the `/api` endpoints.

use crate::{DayOfWeek, SlotTime, SLOT_MINUTES};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which of `dayOfWeek` / `specificDate` a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    /// Weekly rule, scoped to `year`.
    Recurring,
    /// Extra availability on one date.
    SpecificDate,
    /// Unavailable on one date despite recurring rules.
    Exception,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Recurring => "RECURRING",
            ScheduleType::SpecificDate => "SPECIFIC_DATE",
            ScheduleType::Exception => "EXCEPTION",
        }
    }

    pub fn is_dated(&self) -> bool {
        !matches!(self, ScheduleType::Recurring)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleValidationError {
    #[error("recurring schedule requires dayOfWeek")]
    MissingDayOfWeek,
    #[error("recurring schedule must not carry specificDate")]
    UnexpectedSpecificDate,
    #[error("{0} schedule requires specificDate")]
    MissingSpecificDate(&'static str),
    #[error("{0} schedule must not carry dayOfWeek")]
    UnexpectedDayOfWeek(&'static str),
    #[error("startTime {start} must be before endTime {end}")]
    EmptyRange { start: SlotTime, end: SlotTime },
    #[error("time {0} is not on a 30-minute boundary")]
    Misaligned(SlotTime),
    #[error("specificDate {date} is outside year {year}")]
    YearMismatch { date: NaiveDate, year: i32 },
}

fn validate_shape(
    schedule_type: ScheduleType,
    day_of_week: Option<DayOfWeek>,
    specific_date: Option<NaiveDate>,
    start_time: SlotTime,
    end_time: SlotTime,
    year: i32,
) -> Result<(), ScheduleValidationError> {
    match schedule_type {
        ScheduleType::Recurring => {
            if day_of_week.is_none() {
                return Err(ScheduleValidationError::MissingDayOfWeek);
            }
            if specific_date.is_some() {
                return Err(ScheduleValidationError::UnexpectedSpecificDate);
            }
        }
        dated => {
            let Some(date) = specific_date else {
                return Err(ScheduleValidationError::MissingSpecificDate(dated.as_str()));
            };
            if day_of_week.is_some() {
                return Err(ScheduleValidationError::UnexpectedDayOfWeek(dated.as_str()));
            }
            if date.year() != year {
                return Err(ScheduleValidationError::YearMismatch { date, year });
            }
        }
    }
    if start_time >= end_time {
        return Err(ScheduleValidationError::EmptyRange {
            start: start_time,
            end: end_time,
        });
    }
    for t in [start_time, end_time] {
        if !t.is_aligned(SLOT_MINUTES) {
            return Err(ScheduleValidationError::Misaligned(t));
        }
    }
    Ok(())
}

fn default_active() -> bool {
    true
}

/// Persisted availability record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Assigned by the backend; absent until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub interviewer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub schedule_type: ScheduleType,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub year: i32,
}

impl ScheduleRecord {
    pub fn validate(&self) -> Result<(), ScheduleValidationError> {
        validate_shape(
            self.schedule_type,
            self.day_of_week,
            self.specific_date,
            self.start_time,
            self.end_time,
            self.year,
        )
    }

    pub fn duration_minutes(&self) -> u16 {
        self.start_time.minutes_until(self.end_time)
    }

    /// True when `time` falls in `[startTime, endTime)`.
    pub fn covers(&self, time: SlotTime) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// True when the record's rule applies on `date` (ignores `isActive`).
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.schedule_type {
            ScheduleType::Recurring => {
                self.year == date.year() && self.day_of_week == Some(DayOfWeek::of(date))
            }
            ScheduleType::SpecificDate | ScheduleType::Exception => {
                self.specific_date == Some(date)
            }
        }
    }
}

/// Create payload: a [`ScheduleRecord`] without `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub interviewer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub schedule_type: ScheduleType,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub year: i32,
}

impl NewSchedule {
    /// Active weekly rule.
    pub fn recurring(
        interviewer_id: i64,
        day: DayOfWeek,
        start_time: SlotTime,
        end_time: SlotTime,
        year: i32,
    ) -> Self {
        Self {
            interviewer_id,
            day_of_week: Some(day),
            specific_date: None,
            start_time,
            end_time,
            schedule_type: ScheduleType::Recurring,
            is_active: true,
            year,
        }
    }

    /// Active dated record (`SPECIFIC_DATE` or `EXCEPTION`); `year` follows the date.
    pub fn dated(
        interviewer_id: i64,
        schedule_type: ScheduleType,
        date: NaiveDate,
        start_time: SlotTime,
        end_time: SlotTime,
    ) -> Self {
        Self {
            interviewer_id,
            day_of_week: None,
            specific_date: Some(date),
            start_time,
            end_time,
            schedule_type,
            is_active: true,
            year: date.year(),
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleValidationError> {
        validate_shape(
            self.schedule_type,
            self.day_of_week,
            self.specific_date,
            self.start_time,
            self.end_time,
            self.year,
        )
    }

    pub fn into_record(self, id: i64) -> ScheduleRecord {
        ScheduleRecord {
            id: Some(id),
            interviewer_id: self.interviewer_id,
            day_of_week: self.day_of_week,
            specific_date: self.specific_date,
            start_time: self.start_time,
            end_time: self.end_time,
            schedule_type: self.schedule_type,
            is_active: self.is_active,
            year: self.year,
        }
    }
}

/// Partial update (`PUT /interviewer-schedules/{id}`): only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<SlotTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<SlotTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<ScheduleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl ScheduleUpdate {
    /// Applies the present fields. A changed `scheduleType` drops whichever of
    /// `dayOfWeek` / `specificDate` the new type does not carry.
    pub fn apply_to(&self, record: &mut ScheduleRecord) {
        if let Some(d) = self.day_of_week {
            record.day_of_week = Some(d);
        }
        if let Some(d) = self.specific_date {
            record.specific_date = Some(d);
        }
        if let Some(t) = self.start_time {
            record.start_time = t;
        }
        if let Some(t) = self.end_time {
            record.end_time = t;
        }
        if let Some(a) = self.is_active {
            record.is_active = a;
        }
        if let Some(y) = self.year {
            record.year = y;
        }
        if let Some(ty) = self.schedule_type {
            record.schedule_type = ty;
            if ty.is_dated() {
                record.day_of_week = None;
            } else {
                record.specific_date = None;
            }
        }
    }
}

/// Interviewer identity as returned by availability and directory endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewerSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// One row of the workload statistics endpoint.
///
/// The backend emits these as positional tuples
/// `[interviewerId, firstName, lastName, scheduleCount, totalMinutes]`;
/// the object form with camelCase keys is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WorkloadRowRepr")]
pub struct WorkloadRow {
    pub interviewer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub schedule_count: u64,
    pub total_minutes: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WorkloadRowRepr {
    Tuple(i64, String, String, u64, u64),
    Object {
        #[serde(rename = "interviewerId")]
        interviewer_id: i64,
        #[serde(rename = "firstName")]
        first_name: String,
        #[serde(rename = "lastName")]
        last_name: String,
        #[serde(rename = "scheduleCount")]
        schedule_count: u64,
        #[serde(rename = "totalMinutes")]
        total_minutes: u64,
    },
}

impl From<WorkloadRowRepr> for WorkloadRow {
    fn from(r: WorkloadRowRepr) -> Self {
        match r {
            WorkloadRowRepr::Tuple(interviewer_id, first_name, last_name, schedule_count, total_minutes)
            | WorkloadRowRepr::Object {
                interviewer_id,
                first_name,
                last_name,
                schedule_count,
                total_minutes,
            } => WorkloadRow {
                interviewer_id,
                first_name,
                last_name,
                schedule_count,
                total_minutes,
            },
        }
    }
}

/// Availability count for one half-hour slot of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub time: SlotTime,
    pub available_count: u32,
}

/// Per-slot availability counts for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySummary {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

/// Backend error body: `{ "message": "..." }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

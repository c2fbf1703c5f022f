//! Month view of schedule records.

use admit_types::{DayOfWeek, ScheduleRecord, ScheduleType, SlotTime};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub schedule_id: Option<i64>,
    pub interviewer_id: i64,
    pub schedule_type: ScheduleType,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Sorted by start time, then end time, then interviewer.
    pub entries: Vec<CalendarEntry>,
}

impl CalendarDay {
    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::of(self.date)
    }

    /// True when any recurring or specific-date entry falls on this day.
    pub fn has_availability(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.schedule_type != ScheduleType::Exception)
    }

    pub fn exceptions(&self) -> impl Iterator<Item = &CalendarEntry> {
        self.entries
            .iter()
            .filter(|e| e.schedule_type == ScheduleType::Exception)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    days: Vec<CalendarDay>,
}

impl MonthCalendar {
    /// Buckets active `records` into the days of `year`/`month`. `None` for an invalid month.
    pub fn build(year: i32, month: u32, records: &[ScheduleRecord]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| {
                let mut entries: Vec<CalendarEntry> = records
                    .iter()
                    .filter(|r| r.is_active && r.applies_on(date))
                    .map(|r| CalendarEntry {
                        schedule_id: r.id,
                        interviewer_id: r.interviewer_id,
                        schedule_type: r.schedule_type,
                        start_time: r.start_time,
                        end_time: r.end_time,
                    })
                    .collect();
                entries.sort_by_key(|e| (e.start_time, e.end_time, e.interviewer_id));
                CalendarDay { date, entries }
            })
            .collect();
        Some(Self { year, month, days })
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// Day of month, 1-based.
    pub fn day(&self, day: u32) -> Option<&CalendarDay> {
        let idx = usize::try_from(day).ok()?.checked_sub(1)?;
        self.days.get(idx)
    }

    /// Monday-first rows; cells before the 1st and after the last day are `None`.
    pub fn weeks(&self) -> Vec<[Option<&CalendarDay>; 7]> {
        let mut weeks = Vec::new();
        let mut row: [Option<&CalendarDay>; 7] = [None; 7];
        for day in &self.days {
            let col = day.day_of_week().index();
            row[col] = Some(day);
            if col == 6 {
                weeks.push(row);
                row = [None; 7];
            }
        }
        if row.iter().any(Option::is_some) {
            weeks.push(row);
        }
        weeks
    }
}

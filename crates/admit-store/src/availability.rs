//! Availability rule evaluation: recurring and date-specific rules minus exceptions.

use admit_types::{ScheduleRecord, ScheduleType, SlotTime, BUSINESS_END, BUSINESS_START, SLOT_MINUTES};
use chrono::NaiveDate;

/// Half-hour slot starts of the business window.
pub fn business_slots() -> impl Iterator<Item = SlotTime> {
    BUSINESS_START.steps_until(BUSINESS_END, SLOT_MINUTES)
}

/// True when one interviewer's `records` make them free at `(date, time)`.
///
/// Available means an active RECURRING rule for the date's weekday and year, or an
/// active SPECIFIC_DATE record for the date, covers `time`, and no active EXCEPTION
/// for the date covers it.
pub fn available_at<'a, I>(records: I, date: NaiveDate, time: SlotTime) -> bool
where
    I: IntoIterator<Item = &'a ScheduleRecord>,
{
    let mut offered = false;
    for r in records {
        if !r.is_active || !r.applies_on(date) || !r.covers(time) {
            continue;
        }
        match r.schedule_type {
            ScheduleType::Exception => return false,
            ScheduleType::Recurring | ScheduleType::SpecificDate => offered = true,
        }
    }
    offered
}

#[cfg(test)]
mod tests {
    use super::*;
    use admit_types::{DayOfWeek, NewSchedule};

    fn t(h: u8, m: u8) -> SlotTime {
        SlotTime::from_hm(h, m).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    #[test]
    fn recurring_rule_makes_interviewer_available() {
        let recs = vec![NewSchedule::recurring(1, DayOfWeek::Monday, t(9, 0), t(11, 0), 2026).into_record(1)];
        assert!(available_at(&recs, monday(), t(10, 30)));
        assert!(!available_at(&recs, monday(), t(11, 0)));
        assert!(!available_at(&recs, monday().succ_opt().unwrap(), t(10, 0)));
    }

    #[test]
    fn exception_overrides_recurring_rule() {
        let recs = vec![
            NewSchedule::recurring(1, DayOfWeek::Monday, t(9, 0), t(11, 0), 2026).into_record(1),
            NewSchedule::dated(1, ScheduleType::Exception, monday(), t(10, 0), t(10, 30)).into_record(2),
        ];
        assert!(available_at(&recs, monday(), t(9, 30)));
        assert!(!available_at(&recs, monday(), t(10, 0)));
    }

    #[test]
    fn inactive_records_are_ignored() {
        let mut rec = NewSchedule::dated(1, ScheduleType::SpecificDate, monday(), t(14, 0), t(15, 0)).into_record(1);
        assert!(available_at([&rec], monday(), t(14, 0)));
        rec.is_active = false;
        assert!(!available_at([&rec], monday(), t(14, 0)));
    }

    #[test]
    fn business_window_has_eighteen_slots() {
        assert_eq!(business_slots().count(), 18);
    }
}

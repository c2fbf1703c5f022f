//! Workload aggregation over schedule records (the statistics endpoint's query).

use admit_types::{InterviewerSummary, ScheduleRecord, ScheduleType, WorkloadRow};
use std::collections::BTreeMap;

/// One row per directory interviewer plus any other interviewer with an active
/// RECURRING or SPECIFIC_DATE record in `year`, ordered by interviewer id.
/// Directory interviewers without such records get a zero row. EXCEPTION records
/// are not workload. An interviewer missing from `directory` gets empty names.
pub fn workload_rows<'a, I>(
    records: I,
    directory: &BTreeMap<i64, InterviewerSummary>,
    year: i32,
) -> Vec<WorkloadRow>
where
    I: IntoIterator<Item = &'a ScheduleRecord>,
{
    let mut totals: BTreeMap<i64, (u64, u64)> =
        directory.keys().map(|id| (*id, (0, 0))).collect();
    for r in records {
        if !r.is_active || r.year != year || r.schedule_type == ScheduleType::Exception {
            continue;
        }
        let entry = totals.entry(r.interviewer_id).or_default();
        entry.0 = entry.0.saturating_add(1);
        entry.1 = entry.1.saturating_add(u64::from(r.duration_minutes()));
    }
    totals
        .into_iter()
        .map(|(interviewer_id, (schedule_count, total_minutes))| {
            let (first_name, last_name) = directory
                .get(&interviewer_id)
                .map(|i| (i.first_name.clone(), i.last_name.clone()))
                .unwrap_or_default();
            WorkloadRow {
                interviewer_id,
                first_name,
                last_name,
                schedule_count,
                total_minutes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use admit_types::{DayOfWeek, NewSchedule, SlotTime};
    use chrono::NaiveDate;

    fn t(h: u8, m: u8) -> SlotTime {
        SlotTime::from_hm(h, m).unwrap()
    }

    #[test]
    fn sums_minutes_per_interviewer() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let mut inactive = NewSchedule::recurring(1, DayOfWeek::Friday, t(8, 0), t(17, 0), 2026).into_record(4);
        inactive.is_active = false;
        let recs = vec![
            NewSchedule::recurring(1, DayOfWeek::Monday, t(9, 0), t(11, 0), 2026).into_record(1),
            NewSchedule::recurring(1, DayOfWeek::Tuesday, t(9, 0), t(9, 30), 2026).into_record(2),
            NewSchedule::dated(2, ScheduleType::SpecificDate, date, t(13, 0), t(14, 0)).into_record(3),
            inactive,
            NewSchedule::dated(2, ScheduleType::Exception, date, t(13, 0), t(13, 30)).into_record(5),
            NewSchedule::recurring(3, DayOfWeek::Monday, t(9, 0), t(11, 0), 2025).into_record(6),
        ];
        let mut directory = BTreeMap::new();
        directory.insert(
            1,
            InterviewerSummary {
                id: 1,
                first_name: "Ana".into(),
                last_name: "Kim".into(),
                role: "TEACHER".into(),
                subject: None,
                level: None,
            },
        );
        let rows = workload_rows(&recs, &directory, 2026);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].interviewer_id, 1);
        assert_eq!(rows[0].schedule_count, 2);
        assert_eq!(rows[0].total_minutes, 150);
        assert_eq!(rows[0].first_name, "Ana");
        assert_eq!(rows[1].interviewer_id, 2);
        assert_eq!(rows[1].total_minutes, 60);
        assert_eq!(rows[1].first_name, "");
    }

    #[test]
    fn directory_interviewers_without_records_get_zero_rows() {
        let directory: BTreeMap<i64, InterviewerSummary> = [(1, "Ana"), (2, "Ben")]
            .into_iter()
            .map(|(id, first)| {
                (
                    id,
                    InterviewerSummary {
                        id,
                        first_name: first.into(),
                        last_name: "Kim".into(),
                        role: "TEACHER".into(),
                        subject: None,
                        level: None,
                    },
                )
            })
            .collect();
        let recs = vec![NewSchedule::recurring(1, DayOfWeek::Monday, t(9, 0), t(10, 0), 2026).into_record(1)];
        let rows = workload_rows(&recs, &directory, 2026);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_minutes, 60);
        assert_eq!(rows[1].interviewer_id, 2);
        assert_eq!(rows[1].first_name, "Ben");
        assert_eq!(rows[1].schedule_count, 0);
        assert_eq!(rows[1].total_minutes, 0);
    }
}

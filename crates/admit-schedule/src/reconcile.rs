//! Reconciliation of a [`SlotGrid`] against persisted schedule records.
//!
//! Both sides are reduced to sets of 30-minute [`SlotKey`]s; the plan is their
//! difference. Persisted state is one record per slot, so a save never merges
//! neighbouring slots into a range.

use crate::grid::{GridConfig, SlotGrid};
use admit_types::{NewSchedule, ScheduleRecord, ScheduleType, SlotKey};
use std::collections::{BTreeMap, BTreeSet};

/// The interviewer and scheduling year an editor session works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleScope {
    pub interviewer_id: i64,
    pub year: i32,
}

impl ScheduleScope {
    pub fn new(interviewer_id: i64, year: i32) -> Self {
        Self {
            interviewer_id,
            year,
        }
    }

    /// Active recurring records of this interviewer and year, with an id.
    pub fn includes(&self, record: &ScheduleRecord) -> bool {
        record.id.is_some()
            && record.is_active
            && record.schedule_type == ScheduleType::Recurring
            && record.interviewer_id == self.interviewer_id
            && record.year == self.year
    }
}

/// Slot keys covered by a RECURRING record's `[startTime, endTime)`; empty for dated records.
pub fn expand_record(record: &ScheduleRecord, slot_minutes: u16) -> Vec<SlotKey> {
    match (record.schedule_type, record.day_of_week) {
        (ScheduleType::Recurring, Some(day)) => record
            .start_time
            .steps_until(record.end_time, slot_minutes)
            .map(|start| SlotKey::new(day, start))
            .collect(),
        _ => Vec::new(),
    }
}

/// In-window slot key → id of the record covering it, for records in `scope`.
/// When records overlap, the lowest id wins.
pub fn existing_slots(
    records: &[ScheduleRecord],
    scope: ScheduleScope,
    config: &GridConfig,
) -> BTreeMap<SlotKey, i64> {
    let mut out: BTreeMap<SlotKey, i64> = BTreeMap::new();
    for r in records.iter().filter(|r| scope.includes(r)) {
        let Some(id) = r.id else { continue };
        for key in expand_record(r, config.slot_minutes) {
            if !config.contains(key) {
                continue;
            }
            out.entry(key)
                .and_modify(|cur| *cur = (*cur).min(id))
                .or_insert(id);
        }
    }
    out
}

/// Mutations that bring the server in line with the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Record ids to delete, ascending.
    pub deletes: Vec<i64>,
    /// Single-slot recurring records to create, in key order.
    pub creates: Vec<NewSchedule>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.creates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deletes.len() + self.creates.len()
    }
}

/// Diff the grid's desired slots against `records`.
///
/// A record is deleted when any of its in-window slots is no longer desired. Slots
/// of a deleted record that should survive (still desired, or outside the window)
/// are re-created one record per slot, so applying the plan leaves the server with
/// exactly the desired in-window slots. Slots covered by a record that is kept are
/// not touched.
pub fn reconcile(grid: &SlotGrid, records: &[ScheduleRecord], scope: ScheduleScope) -> ReconcilePlan {
    let config = grid.config();
    let desired = grid.desired_keys();

    let mut doomed: BTreeSet<i64> = BTreeSet::new();
    let mut kept_cover: BTreeSet<SlotKey> = BTreeSet::new();
    let mut orphaned: BTreeSet<SlotKey> = BTreeSet::new();

    let in_scope: Vec<(i64, Vec<SlotKey>)> = records
        .iter()
        .filter(|r| scope.includes(r))
        .filter_map(|r| r.id.map(|id| (id, expand_record(r, config.slot_minutes))))
        .collect();

    for (id, keys) in &in_scope {
        if keys.iter().any(|k| config.contains(*k) && !desired.contains(k)) {
            doomed.insert(*id);
        }
    }
    for (id, keys) in &in_scope {
        if doomed.contains(id) {
            orphaned.extend(keys.iter().filter(|k| !config.contains(**k)).copied());
        } else {
            kept_cover.extend(keys.iter().copied());
        }
    }

    let creates = desired
        .iter()
        .chain(orphaned.iter())
        .filter(|k| !kept_cover.contains(*k))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|k| {
            k.start
                .checked_add_minutes(config.slot_minutes)
                .map(|end| NewSchedule::recurring(scope.interviewer_id, k.day, k.start, end, scope.year))
        })
        .collect();

    ReconcilePlan {
        deletes: doomed.into_iter().collect(),
        creates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use admit_types::{DayOfWeek, SlotTime};
    use chrono::NaiveDate;

    fn t(h: u8, m: u8) -> SlotTime {
        SlotTime::from_hm(h, m).unwrap()
    }

    fn key(day: DayOfWeek, h: u8, m: u8) -> SlotKey {
        SlotKey::new(day, t(h, m))
    }

    fn scope() -> ScheduleScope {
        ScheduleScope::new(1, 2026)
    }

    fn rec(id: i64, day: DayOfWeek, start: SlotTime, end: SlotTime) -> ScheduleRecord {
        NewSchedule::recurring(1, day, start, end, 2026).into_record(id)
    }

    /// Applies a plan the way the backend would, issuing ids from `next_id`.
    fn apply(records: &[ScheduleRecord], plan: &ReconcilePlan, next_id: &mut i64) -> Vec<ScheduleRecord> {
        let mut out: Vec<ScheduleRecord> = records
            .iter()
            .filter(|r| !r.id.is_some_and(|id| plan.deletes.contains(&id)))
            .cloned()
            .collect();
        for c in &plan.creates {
            out.push(c.clone().into_record(*next_id));
            *next_id += 1;
        }
        out
    }

    fn covered(records: &[ScheduleRecord]) -> BTreeSet<SlotKey> {
        records
            .iter()
            .filter(|r| scope().includes(r))
            .flat_map(|r| expand_record(r, 30))
            .collect()
    }

    #[test]
    fn expands_two_hour_range_into_four_slots() {
        let keys = expand_record(&rec(1, DayOfWeek::Monday, t(9, 0), t(11, 0)), 30);
        assert_eq!(
            keys,
            vec![
                key(DayOfWeek::Monday, 9, 0),
                key(DayOfWeek::Monday, 9, 30),
                key(DayOfWeek::Monday, 10, 0),
                key(DayOfWeek::Monday, 10, 30),
            ]
        );
    }

    #[test]
    fn dated_records_do_not_expand() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let ex = NewSchedule::dated(1, ScheduleType::Exception, date, t(9, 0), t(10, 0)).into_record(9);
        assert!(expand_record(&ex, 30).is_empty());
    }

    #[test]
    fn extending_a_range_creates_only_the_new_slot() {
        let records = vec![rec(1, DayOfWeek::Monday, t(9, 0), t(10, 0))];
        let mut grid = SlotGrid::from_records(GridConfig::default(), scope(), &records);
        grid.toggle(key(DayOfWeek::Monday, 10, 0)).unwrap();

        let plan = reconcile(&grid, &records, scope());
        assert!(plan.deletes.is_empty());
        assert_eq!(
            plan.creates,
            vec![NewSchedule::recurring(1, DayOfWeek::Monday, t(10, 0), t(10, 30), 2026)]
        );
    }

    #[test]
    fn clearing_a_slot_deletes_its_record() {
        let records = vec![
            rec(1, DayOfWeek::Tuesday, t(9, 0), t(9, 30)),
            rec(2, DayOfWeek::Tuesday, t(9, 30), t(10, 0)),
        ];
        let mut grid = SlotGrid::from_records(GridConfig::default(), scope(), &records);
        assert_eq!(grid.toggle(key(DayOfWeek::Tuesday, 9, 30)).unwrap(), CellState::Empty);

        let plan = reconcile(&grid, &records, scope());
        assert_eq!(plan.deletes, vec![2]);
        assert!(plan.creates.is_empty());
    }

    #[test]
    fn splitting_a_range_recreates_the_remaining_slots() {
        let records = vec![rec(7, DayOfWeek::Wednesday, t(9, 0), t(10, 30))];
        let mut grid = SlotGrid::from_records(GridConfig::default(), scope(), &records);
        grid.toggle(key(DayOfWeek::Wednesday, 9, 30)).unwrap();

        let plan = reconcile(&grid, &records, scope());
        assert_eq!(plan.deletes, vec![7]);
        let starts: Vec<SlotTime> = plan.creates.iter().map(|c| c.start_time).collect();
        assert_eq!(starts, vec![t(9, 0), t(10, 0)]);
    }

    #[test]
    fn unrelated_records_are_left_alone() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let mut inactive = rec(3, DayOfWeek::Friday, t(9, 0), t(9, 30));
        inactive.is_active = false;
        let records = vec![
            rec(1, DayOfWeek::Monday, t(18, 0), t(19, 0)),
            NewSchedule::dated(1, ScheduleType::SpecificDate, date, t(9, 0), t(10, 0)).into_record(2),
            inactive,
            NewSchedule::recurring(1, DayOfWeek::Monday, t(9, 0), t(9, 30), 2025).into_record(4),
            NewSchedule::recurring(2, DayOfWeek::Monday, t(9, 0), t(9, 30), 2026).into_record(5),
        ];
        let grid = SlotGrid::new(GridConfig::default());
        assert!(reconcile(&grid, &records, scope()).is_empty());
    }

    #[test]
    fn deleting_a_record_that_leaves_the_window_keeps_its_outside_slot() {
        let records = vec![rec(1, DayOfWeek::Thursday, t(16, 30), t(17, 30))];
        let mut grid = SlotGrid::from_records(GridConfig::default(), scope(), &records);
        grid.toggle(key(DayOfWeek::Thursday, 16, 30)).unwrap();

        let plan = reconcile(&grid, &records, scope());
        assert_eq!(plan.deletes, vec![1]);
        assert_eq!(
            plan.creates,
            vec![NewSchedule::recurring(1, DayOfWeek::Thursday, t(17, 0), t(17, 30), 2026)]
        );
    }

    #[test]
    fn applied_plan_matches_grid_and_reconciles_to_nothing() {
        let config = GridConfig::default();
        let all_keys: Vec<SlotKey> = config.keys().collect();
        // Deterministic pseudo-random selections over a fixed starting state.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        for _ in 0..50 {
            let mut next_id = 100;
            let records = vec![
                rec(1, DayOfWeek::Monday, t(8, 0), t(10, 0)),
                rec(2, DayOfWeek::Monday, t(13, 0), t(13, 30)),
                rec(3, DayOfWeek::Saturday, t(15, 0), t(17, 0)),
            ];
            let mut grid = SlotGrid::from_records(config.clone(), scope(), &records);
            for _ in 0..20 {
                let k = all_keys[(next() % all_keys.len() as u64) as usize];
                grid.toggle(k).unwrap();
            }
            let desired = grid.desired_keys();

            let plan = reconcile(&grid, &records, scope());
            let created: BTreeSet<SlotKey> = plan
                .creates
                .iter()
                .map(|c| SlotKey::new(c.day_of_week.unwrap(), c.start_time))
                .collect();
            assert_eq!(created.len(), plan.creates.len());

            let after = apply(&records, &plan, &mut next_id);
            let in_window: BTreeSet<SlotKey> =
                covered(&after).into_iter().filter(|k| config.contains(*k)).collect();
            assert_eq!(in_window, desired);

            let reloaded = SlotGrid::from_records(config.clone(), scope(), &after);
            assert!(reconcile(&reloaded, &after, scope()).is_empty());
        }
    }
}

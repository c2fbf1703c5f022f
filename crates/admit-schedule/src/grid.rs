//! Weekly availability grid: day × half-hour cells with a tri-state selection.

use crate::reconcile::{existing_slots, ScheduleScope};
use admit_types::{
    DayOfWeek, ScheduleRecord, SlotKey, SlotTime, BUSINESS_END, BUSINESS_START, SLOT_MINUTES,
};
use std::collections::{BTreeMap, BTreeSet};

/// Shape of the editable grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub window_start: SlotTime,
    /// Exclusive: the last slot starts `slot_minutes` before this.
    pub window_end: SlotTime,
    pub slot_minutes: u16,
    pub days: Vec<DayOfWeek>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            window_start: BUSINESS_START,
            window_end: BUSINESS_END,
            slot_minutes: SLOT_MINUTES,
            days: DayOfWeek::ALL.to_vec(),
        }
    }
}

impl GridConfig {
    /// True when `key` is a cell of this grid.
    pub fn contains(&self, key: SlotKey) -> bool {
        self.days.contains(&key.day)
            && key.start >= self.window_start
            && key.start.is_aligned(self.slot_minutes)
            && key
                .start
                .checked_add_minutes(self.slot_minutes)
                .is_some_and(|end| end <= self.window_end)
    }

    pub fn slot_starts(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.window_start
            .steps_until(self.window_end, self.slot_minutes)
            .filter(move |t| {
                t.checked_add_minutes(self.slot_minutes)
                    .is_some_and(|end| end <= self.window_end)
            })
    }

    /// Every cell, day-major.
    pub fn keys(&self) -> impl Iterator<Item = SlotKey> + '_ {
        self.days
            .iter()
            .flat_map(move |&day| self.slot_starts().map(move |start| SlotKey::new(day, start)))
    }
}

/// State of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    /// Selected in this session, not yet saved.
    Pending,
    /// Backed by the schedule record with this id.
    Persisted(i64),
}

impl CellState {
    pub fn is_selected(&self) -> bool {
        !matches!(self, CellState::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("slot {0} is outside the editable window")]
    OutOfWindow(SlotKey),
    #[error("range {start}-{end} is empty")]
    EmptyRange { start: SlotTime, end: SlotTime },
}

/// Per-session selection state. Cells not present in the map are [`CellState::Empty`].
#[derive(Debug, Clone)]
pub struct SlotGrid {
    config: GridConfig,
    cells: BTreeMap<SlotKey, CellState>,
}

impl SlotGrid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: BTreeMap::new(),
        }
    }

    /// Grid with every in-window slot of `scope`'s records marked persisted.
    pub fn from_records(config: GridConfig, scope: ScheduleScope, records: &[ScheduleRecord]) -> Self {
        let cells = existing_slots(records, scope, &config)
            .into_iter()
            .map(|(key, id)| (key, CellState::Persisted(id)))
            .collect();
        Self { config, cells }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell(&self, key: SlotKey) -> CellState {
        self.cells.get(&key).copied().unwrap_or_default()
    }

    fn check(&self, key: SlotKey) -> Result<(), GridError> {
        if self.config.contains(key) {
            Ok(())
        } else {
            Err(GridError::OutOfWindow(key))
        }
    }

    /// Empty → Pending, Pending → Empty, Persisted → Empty. Returns the new state.
    pub fn toggle(&mut self, key: SlotKey) -> Result<CellState, GridError> {
        self.check(key)?;
        let next = match self.cell(key) {
            CellState::Empty => CellState::Pending,
            CellState::Pending | CellState::Persisted(_) => CellState::Empty,
        };
        self.put(key, next);
        Ok(next)
    }

    /// Select (Empty → Pending) or clear (→ Empty) one cell; persisted cells stay when selecting.
    pub fn set(&mut self, key: SlotKey, selected: bool) -> Result<CellState, GridError> {
        self.check(key)?;
        let next = match (self.cell(key), selected) {
            (CellState::Empty, true) => CellState::Pending,
            (state, true) => state,
            (_, false) => CellState::Empty,
        };
        self.put(key, next);
        Ok(next)
    }

    /// Applies [`SlotGrid::set`] to every slot of `[start, end)` on `day`.
    /// Validates the whole range before touching any cell; returns the number of cells visited.
    pub fn set_range(
        &mut self,
        day: DayOfWeek,
        start: SlotTime,
        end: SlotTime,
        selected: bool,
    ) -> Result<usize, GridError> {
        if start >= end {
            return Err(GridError::EmptyRange { start, end });
        }
        let keys: Vec<SlotKey> = start
            .steps_until(end, self.config.slot_minutes)
            .map(|t| SlotKey::new(day, t))
            .collect();
        for &key in &keys {
            self.check(key)?;
        }
        for &key in &keys {
            self.set(key, selected)?;
        }
        Ok(keys.len())
    }

    fn put(&mut self, key: SlotKey, state: CellState) {
        if state == CellState::Empty {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, state);
        }
    }

    /// Cells that should exist on the server after a save (Pending or Persisted).
    pub fn desired_keys(&self) -> BTreeSet<SlotKey> {
        self.cells
            .iter()
            .filter(|(_, s)| s.is_selected())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Brings the selection back to `desired` after the cells were rebuilt from records:
    /// selected cells outside it are cleared, missing in-window ones become Pending.
    /// Returns the number of cells changed.
    pub fn reapply(&mut self, desired: &BTreeSet<SlotKey>) -> usize {
        let stale: Vec<SlotKey> = self
            .cells
            .keys()
            .filter(|k| !desired.contains(*k))
            .copied()
            .collect();
        let mut changed = stale.len();
        for key in stale {
            self.cells.remove(&key);
        }
        for &key in desired {
            if self.config.contains(key) && !self.cell(key).is_selected() {
                self.cells.insert(key, CellState::Pending);
                changed += 1;
            }
        }
        changed
    }

    pub fn pending_count(&self) -> usize {
        self.cells
            .values()
            .filter(|s| matches!(s, CellState::Pending))
            .count()
    }

    /// Non-empty cells in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, CellState)> + '_ {
        self.cells.iter().map(|(k, s)| (*k, *s))
    }
}

//! Interviewer availability editing: the weekly slot grid, its reconciliation against
//! persisted schedule records, the editor session that saves it, and month calendar views.

mod calendar;
mod editor;
mod grid;
mod reconcile;

pub use calendar::{CalendarDay, CalendarEntry, MonthCalendar};
pub use editor::{SaveError, SaveReport, WeeklyEditor};
pub use grid::{CellState, GridConfig, GridError, SlotGrid};
pub use reconcile::{existing_slots, expand_record, reconcile, ReconcilePlan, ScheduleScope};

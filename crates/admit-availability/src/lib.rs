//! Availability search state for picking an interviewer, and the per-day slot summary.

mod selector;
mod summary;

pub use selector::{
    AvailabilitySelector, SearchMode, SearchOutcome, SearchRequest, SearchResponse,
    SelectionError, Ticket,
};
pub use summary::{load_day_summary, DaySummaryView};

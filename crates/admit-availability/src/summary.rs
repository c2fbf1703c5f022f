//! Per-day availability summary: how many interviewers are free in each business slot.

use admit_types::{
    AvailabilityService, AvailabilitySummary, Credentials, ServiceError, SlotAvailability, SlotTime,
};
use chrono::NaiveDate;

/// Read-side helpers over one day's per-slot availability counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummaryView {
    summary: AvailabilitySummary,
}

impl DaySummaryView {
    /// Slots are kept in time order regardless of the order received.
    pub fn new(mut summary: AvailabilitySummary) -> Self {
        summary.slots.sort_by_key(|s| s.time);
        Self { summary }
    }

    pub fn date(&self) -> NaiveDate {
        self.summary.date
    }

    pub fn slots(&self) -> &[SlotAvailability] {
        &self.summary.slots
    }

    pub fn count_at(&self, time: SlotTime) -> u32 {
        self.summary
            .slots
            .iter()
            .find(|s| s.time == time)
            .map_or(0, |s| s.available_count)
    }

    /// Busiest slot; the earliest wins a tie. `None` when nobody is available all day.
    pub fn peak(&self) -> Option<&SlotAvailability> {
        self.summary
            .slots
            .iter()
            .filter(|s| s.available_count > 0)
            .fold(None, |best: Option<&SlotAvailability>, s| match best {
                Some(b) if b.available_count >= s.available_count => Some(b),
                _ => Some(s),
            })
    }

    /// Slots with no available interviewer.
    pub fn unstaffed(&self) -> Vec<SlotTime> {
        self.summary
            .slots
            .iter()
            .filter(|s| s.available_count == 0)
            .map(|s| s.time)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.peak().is_none()
    }

}

/// Fetches the day's summary. Errors are passed through unchanged; callers pick
/// the message with [`ServiceError::user_message`] and `messages::LOAD_SUMMARY_FAILED`.
pub async fn load_day_summary<S>(
    service: &S,
    auth: &Credentials,
    date: NaiveDate,
) -> Result<DaySummaryView, ServiceError>
where
    S: AvailabilityService + ?Sized,
{
    let summary = service.availability_summary(auth, date).await?;
    tracing::debug!(%date, slots = summary.slots.len(), "availability summary loaded");
    Ok(DaySummaryView::new(summary))
}

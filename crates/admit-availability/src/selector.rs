//! AvailabilitySelector: the interviewers free at a chosen slot, plus the current pick.
//!
//! Queries are split into [`AvailabilitySelector::begin`] (issues a ticket),
//! [`SearchRequest::run`] (the network call, no borrow of the selector) and
//! [`AvailabilitySelector::apply`]. Only the response for the latest ticket is applied;
//! anything older is reported as [`SearchOutcome::Stale`] and dropped.

use admit_types::messages::LOAD_AVAILABILITY_FAILED;
use admit_types::{AvailabilityService, Credentials, InterviewerSummary, ServiceError, SlotTime};
use chrono::NaiveDate;

/// Which search endpoint the selector queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Staff search; sends the bearer token.
    Authenticated(Credentials),
    /// Applicant-facing search; sends no credentials.
    Public,
}

/// Sequence number of a query. Later queries get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A query in flight. Cheap to clone and independent of the selector, so it can be
/// moved into a spawned task.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub mode: SearchMode,
}

impl SearchRequest {
    pub async fn run<S>(self, service: &S) -> SearchResponse
    where
        S: AvailabilityService + ?Sized,
    {
        let result = match &self.mode {
            SearchMode::Authenticated(auth) => {
                service
                    .available_interviewers(auth, self.date, self.time)
                    .await
            }
            SearchMode::Public => {
                service
                    .public_available_interviewers(self.date, self.time)
                    .await
            }
        };
        SearchResponse {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SearchResponse {
    pub ticket: Ticket,
    pub result: Result<Vec<InterviewerSummary>, ServiceError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was the latest; the list now holds `count` interviewers.
    Applied { count: usize },
    /// The latest query failed; the list was cleared and an error message set.
    Failed,
    /// A newer query was issued after this one; nothing changed.
    Stale { ticket: Ticket, latest: Ticket },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("interviewer {0} is not in the current results")]
    NotAvailable(i64),
}

#[derive(Debug)]
pub struct AvailabilitySelector {
    mode: SearchMode,
    /// Last ticket issued; `Ticket(0)` until the first query.
    latest: Ticket,
    slot: Option<(NaiveDate, SlotTime)>,
    loading: bool,
    interviewers: Vec<InterviewerSummary>,
    selected: Option<i64>,
    error: Option<String>,
}

impl AvailabilitySelector {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            latest: Ticket(0),
            slot: None,
            loading: false,
            interviewers: Vec::new(),
            selected: None,
            error: None,
        }
    }

    pub fn mode(&self) -> &SearchMode {
        &self.mode
    }

    /// Switches endpoints. Takes effect from the next [`AvailabilitySelector::begin`].
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Starts a query for `(date, time)`. Any response for an earlier ticket becomes stale.
    pub fn begin(&mut self, date: NaiveDate, time: SlotTime) -> SearchRequest {
        let ticket = Ticket(self.latest.0 + 1);
        self.latest = ticket;
        self.slot = Some((date, time));
        self.loading = true;
        tracing::debug!(ticket = ticket.0, %date, %time, "availability query issued");
        SearchRequest {
            ticket,
            date,
            time,
            mode: self.mode.clone(),
        }
    }

    /// Whether `ticket` is the most recent one issued by [`AvailabilitySelector::begin`].
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 != 0 && self.latest == ticket
    }

    /// Applies a response if its ticket is the latest issued.
    ///
    /// On success the list is replaced and a selection not in it is cleared. On
    /// failure the list and selection are cleared and [`AvailabilitySelector::error`]
    /// carries the message to show.
    pub fn apply(&mut self, response: SearchResponse) -> SearchOutcome {
        let latest = self.latest;
        if !self.is_latest(response.ticket) {
            tracing::debug!(
                ticket = response.ticket.0,
                latest = latest.0,
                "stale availability response dropped"
            );
            return SearchOutcome::Stale {
                ticket: response.ticket,
                latest,
            };
        }
        self.loading = false;
        match response.result {
            Ok(list) => {
                if let Some(id) = self.selected {
                    if !list.iter().any(|i| i.id == id) {
                        tracing::debug!(interviewer_id = id, "selection cleared, no longer available");
                        self.selected = None;
                    }
                }
                self.interviewers = list;
                self.error = None;
                tracing::debug!(ticket = latest.0, count = self.interviewers.len(), "availability applied");
                SearchOutcome::Applied {
                    count: self.interviewers.len(),
                }
            }
            Err(e) => {
                tracing::warn!(ticket = latest.0, error = %e, "availability query failed");
                self.interviewers.clear();
                self.selected = None;
                self.error = Some(e.user_message(LOAD_AVAILABILITY_FAILED));
                SearchOutcome::Failed
            }
        }
    }

    /// `begin`, `run` and `apply` in one step.
    pub async fn refresh<S>(&mut self, service: &S, date: NaiveDate, time: SlotTime) -> SearchOutcome
    where
        S: AvailabilityService + ?Sized,
    {
        let request = self.begin(date, time);
        let response = request.run(service).await;
        self.apply(response)
    }

    pub fn select(&mut self, interviewer_id: i64) -> Result<&InterviewerSummary, SelectionError> {
        let idx = self
            .interviewers
            .iter()
            .position(|i| i.id == interviewer_id)
            .ok_or(SelectionError::NotAvailable(interviewer_id))?;
        self.selected = Some(interviewer_id);
        Ok(&self.interviewers[idx])
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&InterviewerSummary> {
        let id = self.selected?;
        self.interviewers.iter().find(|i| i.id == id)
    }

    pub fn interviewers(&self) -> &[InterviewerSummary] {
        &self.interviewers
    }

    /// The slot of the latest query.
    pub fn slot(&self) -> Option<(NaiveDate, SlotTime)> {
        self.slot
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

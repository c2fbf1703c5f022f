//! Seed data for the in-memory store, loaded from a JSON file.

use crate::InMemoryScheduleStore;
use admit_types::{Credentials, InterviewerSummary, NewSchedule, ScheduleService};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed schedule #{index} rejected: {message}")]
    Invalid { index: usize, message: String },
}

/// `{ "interviewers": [...], "schedules": [...] }`; both keys optional.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub interviewers: Vec<InterviewerSummary>,
    #[serde(default)]
    pub schedules: Vec<NewSchedule>,
}

impl Seed {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the directory, then creates every schedule through the normal create path.
    pub async fn apply(self, store: &InMemoryScheduleStore) -> Result<(), SeedError> {
        let n_interviewers = self.interviewers.len();
        let n_schedules = self.schedules.len();
        for i in self.interviewers {
            store.upsert_interviewer(i).await;
        }
        let seed_auth = Credentials::bearer("seed");
        for (index, s) in self.schedules.iter().enumerate() {
            store
                .create_schedule(&seed_auth, s)
                .await
                .map_err(|e| SeedError::Invalid {
                    index,
                    message: e.to_string(),
                })?;
        }
        tracing::info!(
            interviewers = n_interviewers,
            schedules = n_schedules,
            "seed applied"
        );
        Ok(())
    }
}

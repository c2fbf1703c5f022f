//! WeeklyEditor: loads an interviewer's recurring schedule for a year into a
//! [`SlotGrid`], accepts cell edits and saves them back as a delete-then-create batch.

use crate::grid::{CellState, GridConfig, GridError, SlotGrid};
use crate::reconcile::{reconcile, ReconcilePlan, ScheduleScope};
use admit_types::messages::{LOAD_SCHEDULES_FAILED, SAVE_SCHEDULES_FAILED};
use admit_types::{
    Credentials, DayOfWeek, NewSchedule, ScheduleRecord, ScheduleService, ServiceError, SlotKey, SlotTime,
};
use std::collections::BTreeSet;

/// What a save (or a failed save, up to the failure) did on the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub deleted: Vec<i64>,
    pub created: Vec<ScheduleRecord>,
}

impl SaveReport {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.created.is_empty()
    }
}

/// A save stopped early. `applied` lists the mutations that went through before the failure.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("deleting schedule {id} failed: {source}")]
    Delete {
        id: i64,
        applied: SaveReport,
        #[source]
        source: ServiceError,
    },
    #[error("creating schedule {} failed: {source}", slot_label(.schedule))]
    Create {
        schedule: NewSchedule,
        applied: SaveReport,
        #[source]
        source: ServiceError,
    },
    #[error("reloading schedules after save failed: {source}")]
    Reload {
        applied: SaveReport,
        #[source]
        source: ServiceError,
    },
}

fn slot_label(schedule: &NewSchedule) -> String {
    match schedule.day_of_week {
        Some(day) => format!("{} {}-{}", day, schedule.start_time, schedule.end_time),
        None => format!("{}-{}", schedule.start_time, schedule.end_time),
    }
}

impl SaveError {
    pub fn applied(&self) -> &SaveReport {
        match self {
            SaveError::Delete { applied, .. }
            | SaveError::Create { applied, .. }
            | SaveError::Reload { applied, .. } => applied,
        }
    }

    pub fn service_error(&self) -> &ServiceError {
        match self {
            SaveError::Delete { source, .. }
            | SaveError::Create { source, .. }
            | SaveError::Reload { source, .. } => source,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SaveError::Reload { source, .. } => source.user_message(LOAD_SCHEDULES_FAILED),
            other => other.service_error().user_message(SAVE_SCHEDULES_FAILED),
        }
    }
}

/// One editing session over `scope`. Saving takes `&mut self`, so edits and a
/// second save cannot overlap an in-flight save.
pub struct WeeklyEditor<S> {
    service: S,
    auth: Credentials,
    scope: ScheduleScope,
    grid: SlotGrid,
    records: Vec<ScheduleRecord>,
}

impl<S> WeeklyEditor<S>
where
    S: ScheduleService,
{
    pub fn new(service: S, auth: Credentials, scope: ScheduleScope) -> Self {
        Self::with_config(service, auth, scope, GridConfig::default())
    }

    pub fn with_config(service: S, auth: Credentials, scope: ScheduleScope, config: GridConfig) -> Self {
        Self {
            service,
            auth,
            scope,
            grid: SlotGrid::new(config),
            records: Vec::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn scope(&self) -> ScheduleScope {
        self.scope
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Records as of the last successful load, plus whatever a save applied when
    /// the reload after it failed.
    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    /// Fetches the scope's records and rebuilds the grid from them, discarding unsaved edits.
    /// On failure the previous grid and records are kept.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let records = self
            .service
            .schedules_for_year(&self.auth, self.scope.interviewer_id, self.scope.year)
            .await?;
        self.replace_records(records);
        Ok(())
    }

    fn replace_records(&mut self, records: Vec<ScheduleRecord>) {
        self.grid = SlotGrid::from_records(self.grid.config().clone(), self.scope, &records);
        tracing::debug!(
            interviewer_id = self.scope.interviewer_id,
            year = self.scope.year,
            records = records.len(),
            "weekly schedule loaded"
        );
        self.records = records;
    }

    pub fn toggle(&mut self, day: DayOfWeek, start: SlotTime) -> Result<CellState, GridError> {
        self.grid.toggle(SlotKey::new(day, start))
    }

    pub fn set_range(
        &mut self,
        day: DayOfWeek,
        start: SlotTime,
        end: SlotTime,
        selected: bool,
    ) -> Result<usize, GridError> {
        self.grid.set_range(day, start, end, selected)
    }

    /// Mutations a save would issue right now.
    pub fn plan(&self) -> ReconcilePlan {
        reconcile(&self.grid, &self.records, self.scope)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.plan().is_empty()
    }

    /// Issues the plan's deletes, then its creates, then reloads.
    ///
    /// A delete answered with not-found counts as applied. Any other failure stops the
    /// batch; the editor then reloads (or, if that fails too, folds the applied mutations
    /// into its records) and re-marks the selections that did not land as Pending, so a
    /// retry issues only what is still missing. The returned error names the original failure.
    pub async fn save(&mut self) -> Result<SaveReport, SaveError> {
        let plan = self.plan();
        let desired = self.grid.desired_keys();
        let mut applied = SaveReport::default();
        if plan.is_empty() {
            return Ok(applied);
        }
        tracing::info!(
            interviewer_id = self.scope.interviewer_id,
            year = self.scope.year,
            deletes = plan.deletes.len(),
            creates = plan.creates.len(),
            "saving weekly schedule"
        );

        for id in plan.deletes {
            match self.service.delete_schedule(&self.auth, id).await {
                Ok(()) => applied.deleted.push(id),
                Err(source) if source.is_not_found() => {
                    tracing::info!(id, "schedule already gone, delete skipped");
                    applied.deleted.push(id);
                }
                Err(source) => {
                    tracing::warn!(id, error = %source, "schedule delete failed, save aborted");
                    self.restore_after_failure(&desired, &applied).await;
                    return Err(SaveError::Delete { id, applied, source });
                }
            }
        }

        for new in plan.creates {
            match self.service.create_schedule(&self.auth, &new).await {
                Ok(record) => applied.created.push(record),
                Err(source) => {
                    tracing::warn!(slot = %slot_label(&new), error = %source, "schedule create failed, save aborted");
                    self.restore_after_failure(&desired, &applied).await;
                    return Err(SaveError::Create {
                        schedule: new,
                        applied,
                        source,
                    });
                }
            }
        }

        if let Err(source) = self.load().await {
            tracing::warn!(error = %source, "reload after save failed");
            self.absorb(&applied);
            self.grid.reapply(&desired);
            return Err(SaveError::Reload { applied, source });
        }
        tracing::info!(
            deleted = applied.deleted.len(),
            created = applied.created.len(),
            "weekly schedule saved"
        );
        Ok(applied)
    }

    async fn restore_after_failure(&mut self, desired: &BTreeSet<SlotKey>, applied: &SaveReport) {
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "reload after failed save also failed");
            self.absorb(applied);
        }
        let changed = self.grid.reapply(desired);
        tracing::debug!(changed, pending = self.grid.pending_count(), "unsaved selections restored");
    }

    /// Folds mutations known to have landed into the records when a reload is not possible.
    fn absorb(&mut self, applied: &SaveReport) {
        let mut records = std::mem::take(&mut self.records);
        records.retain(|r| r.id.map_or(true, |id| !applied.deleted.contains(&id)));
        records.extend(applied.created.iter().cloned());
        self.replace_records(records);
    }
}

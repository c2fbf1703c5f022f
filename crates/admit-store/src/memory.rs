//! In-memory schedule store implementing both service traits.

use crate::availability::{available_at, business_slots};
use crate::workload::workload_rows;
use admit_types::{
    AuditEvent, AuditListOptions, AvailabilityService, AvailabilitySummary, Credentials,
    InterviewerSummary, MutationKind, NewSchedule, ScheduleRecord, ScheduleService,
    ScheduleUpdate, ServiceError, SlotAvailability, SlotTime, WorkloadRow,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const UNAUTHORIZED_MESSAGE: &str = "missing or empty bearer token";

/// In-memory implementation of [`ScheduleService`] and [`AvailabilityService`].
/// Records and the interviewer directory are keyed by id, so listings come out id-ordered.
pub struct InMemoryScheduleStore {
    /// schedule_id -> record.
    records: Arc<RwLock<BTreeMap<i64, ScheduleRecord>>>,
    /// interviewer_id -> identity.
    interviewers: Arc<RwLock<BTreeMap<i64, InterviewerSummary>>>,
    /// Mutation trail, oldest first.
    audit: Arc<RwLock<Vec<AuditEvent>>>,
    next_id: AtomicI64,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            interviewers: Arc::new(RwLock::new(BTreeMap::new())),
            audit: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Add or replace an interviewer in the directory.
    pub async fn upsert_interviewer(&self, interviewer: InterviewerSummary) {
        self.interviewers
            .write()
            .await
            .insert(interviewer.id, interviewer);
    }

    pub async fn interviewer(&self, id: i64) -> Option<InterviewerSummary> {
        self.interviewers.read().await.get(&id).cloned()
    }

    /// Audit events, newest first.
    pub async fn audit_events(&self, opts: &AuditListOptions) -> Vec<AuditEvent> {
        let guard = self.audit.read().await;
        let offset = opts.offset.unwrap_or(0) as usize;
        let limit = opts.limit.unwrap_or(100) as usize;
        guard
            .iter()
            .rev()
            .filter(|e| opts.interviewer_id.map_or(true, |id| e.interviewer_id == id))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    fn authorize(auth: &Credentials) -> Result<(), ServiceError> {
        if auth.is_present() {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized {
                message: Some(UNAUTHORIZED_MESSAGE.to_string()),
            })
        }
    }

    async fn push_audit(&self, kind: MutationKind, record: &ScheduleRecord) {
        let event = AuditEvent {
            event_id: Uuid::new_v4().to_string(),
            kind,
            schedule_id: record.id.unwrap_or_default(),
            interviewer_id: record.interviewer_id,
            timestamp: Utc::now().to_rfc3339(),
        };
        self.audit.write().await.push(event);
    }

    /// Directory entries (id-ordered) free at `(date, time)`.
    async fn available(&self, date: NaiveDate, time: SlotTime) -> Vec<InterviewerSummary> {
        let records = self.records.read().await;
        let interviewers = self.interviewers.read().await;
        interviewers
            .values()
            .filter(|i| {
                available_at(
                    records.values().filter(|r| r.interviewer_id == i.id),
                    date,
                    time,
                )
            })
            .cloned()
            .collect()
    }

    fn not_found(id: i64) -> ServiceError {
        ServiceError::NotFound(format!("schedule {} not found", id))
    }
}

impl Default for InMemoryScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleService for InMemoryScheduleStore {
    async fn create_schedule(
        &self,
        auth: &Credentials,
        schedule: &NewSchedule,
    ) -> Result<ScheduleRecord, ServiceError> {
        Self::authorize(auth)?;
        schedule.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = schedule.clone().into_record(id);
        self.records.write().await.insert(id, record.clone());
        tracing::info!(
            schedule_id = id,
            interviewer_id = record.interviewer_id,
            schedule_type = record.schedule_type.as_str(),
            "schedule created"
        );
        self.push_audit(MutationKind::Create, &record).await;
        Ok(record)
    }

    async fn update_schedule(
        &self,
        auth: &Credentials,
        id: i64,
        update: &ScheduleUpdate,
    ) -> Result<ScheduleRecord, ServiceError> {
        Self::authorize(auth)?;
        let updated = {
            let mut guard = self.records.write().await;
            let current = guard.get(&id).ok_or_else(|| Self::not_found(id))?;
            let mut candidate = current.clone();
            update.apply_to(&mut candidate);
            candidate.validate()?;
            guard.insert(id, candidate.clone());
            candidate
        };
        tracing::info!(schedule_id = id, "schedule updated");
        self.push_audit(MutationKind::Update, &updated).await;
        Ok(updated)
    }

    async fn delete_schedule(&self, auth: &Credentials, id: i64) -> Result<(), ServiceError> {
        Self::authorize(auth)?;
        let removed = self
            .records
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| Self::not_found(id))?;
        tracing::info!(schedule_id = id, "schedule deleted");
        self.push_audit(MutationKind::Delete, &removed).await;
        Ok(())
    }

    async fn deactivate_schedule(
        &self,
        auth: &Credentials,
        id: i64,
    ) -> Result<ScheduleRecord, ServiceError> {
        Self::authorize(auth)?;
        let record = {
            let mut guard = self.records.write().await;
            let rec = guard.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
            rec.is_active = false;
            rec.clone()
        };
        tracing::info!(schedule_id = id, "schedule deactivated");
        self.push_audit(MutationKind::Deactivate, &record).await;
        Ok(record)
    }

    async fn schedules_for_interviewer(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        Self::authorize(auth)?;
        let guard = self.records.read().await;
        Ok(guard
            .values()
            .filter(|r| r.interviewer_id == interviewer_id)
            .cloned()
            .collect())
    }

    async fn schedules_for_year(
        &self,
        auth: &Credentials,
        interviewer_id: i64,
        year: i32,
    ) -> Result<Vec<ScheduleRecord>, ServiceError> {
        Self::authorize(auth)?;
        let guard = self.records.read().await;
        Ok(guard
            .values()
            .filter(|r| r.interviewer_id == interviewer_id && r.year == year)
            .cloned()
            .collect())
    }

    async fn workload_statistics(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<WorkloadRow>, ServiceError> {
        Self::authorize(auth)?;
        let records = self.records.read().await;
        let interviewers = self.interviewers.read().await;
        Ok(workload_rows(records.values(), &interviewers, year))
    }

    async fn interviewers_with_schedules(
        &self,
        auth: &Credentials,
        year: i32,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        Self::authorize(auth)?;
        let records = self.records.read().await;
        let with_records: HashSet<i64> = records
            .values()
            .filter(|r| r.is_active && r.year == year)
            .map(|r| r.interviewer_id)
            .collect();
        let interviewers = self.interviewers.read().await;
        Ok(interviewers
            .values()
            .filter(|i| with_records.contains(&i.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AvailabilityService for InMemoryScheduleStore {
    async fn available_interviewers(
        &self,
        auth: &Credentials,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        Self::authorize(auth)?;
        Ok(self.available(date, time).await)
    }

    async fn availability_summary(
        &self,
        auth: &Credentials,
        date: NaiveDate,
    ) -> Result<AvailabilitySummary, ServiceError> {
        Self::authorize(auth)?;
        let records = self.records.read().await;
        let interviewers = self.interviewers.read().await;
        // Only records that can apply on this date matter for any slot.
        let mut by_interviewer: BTreeMap<i64, Vec<&ScheduleRecord>> = BTreeMap::new();
        for r in records.values() {
            if r.is_active && r.applies_on(date) {
                by_interviewer.entry(r.interviewer_id).or_default().push(r);
            }
        }
        let slots = business_slots()
            .map(|time| {
                let available_count = interviewers
                    .keys()
                    .filter(|id| {
                        by_interviewer
                            .get(id)
                            .is_some_and(|recs| available_at(recs.iter().copied(), date, time))
                    })
                    .count() as u32;
                SlotAvailability {
                    time,
                    available_count,
                }
            })
            .collect();
        Ok(AvailabilitySummary { date, slots })
    }

    async fn public_available_interviewers(
        &self,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Vec<InterviewerSummary>, ServiceError> {
        Ok(self.available(date, time).await)
    }
}

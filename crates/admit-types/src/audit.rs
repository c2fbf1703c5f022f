//! Mutation audit types: one event per create/update/delete/deactivate of a schedule record.

use serde::{Deserialize, Serialize};

/// Kind of schedule mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Deactivate,
}

/// One audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event_id: String,
    pub kind: MutationKind,
    pub schedule_id: i64,
    pub interviewer_id: i64,
    /// RFC 3339.
    pub timestamp: String,
}

/// Filter + pagination for listing audit events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditListOptions {
    #[serde(default)]
    pub interviewer_id: Option<i64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

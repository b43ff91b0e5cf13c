//! Desk audit events.
//!
//! Every successful mutation emits exactly one event, which the store
//! appends to `event_log`. Variants are only ever added.

use crate::{
    complaint::ComplaintStatus,
    types::{ComplaintId, StaffId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    ComplaintFiled {
        at: DateTime<Utc>,
        complaint_id: ComplaintId,
        category_id: String,
        reported_by: String,
        sla_hours: u32,
    },
    StatusChanged {
        at: DateTime<Utc>,
        complaint_id: ComplaintId,
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
    ComplaintAssigned {
        at: DateTime<Utc>,
        complaint_id: ComplaintId,
        staff_id: StaffId,
        previous: Option<StaffId>,
    },
}

impl DeskEvent {
    pub fn complaint_id(&self) -> &str {
        match self {
            DeskEvent::ComplaintFiled { complaint_id, .. }
            | DeskEvent::StatusChanged { complaint_id, .. }
            | DeskEvent::ComplaintAssigned { complaint_id, .. } => complaint_id,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            DeskEvent::ComplaintFiled { at, .. }
            | DeskEvent::StatusChanged { at, .. }
            | DeskEvent::ComplaintAssigned { at, .. } => *at,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DeskEvent::ComplaintFiled { .. } => "complaint_filed",
            DeskEvent::StatusChanged { .. } => "status_changed",
            DeskEvent::ComplaintAssigned { .. } => "complaint_assigned",
        }
    }
}

/// A row in the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub complaint_id: ComplaintId,
    pub event_type: String,
    pub payload: String, // JSON-serialized DeskEvent
    pub created_at: DateTime<Utc>,
}

impl EventLogEntry {
    pub fn from_event(event: &DeskEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            complaint_id: event.complaint_id().to_string(),
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
            created_at: event.at(),
        })
    }

    pub fn decode(&self) -> serde_json::Result<DeskEvent> {
        serde_json::from_str(&self.payload)
    }
}

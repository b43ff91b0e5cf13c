//! Complaint records and the canonical status vocabulary.
//!
//! Status arrives in several spellings (`open`, `Open`, `In Progress`,
//! `resolved`, …). All of them map onto `ComplaintStatus` here, at the
//! boundary; nothing past this module compares status strings.

use crate::types::{ComplaintId, PhotoRef, StaffId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [Self::Open, Self::InProgress, Self::Resolved];

    /// Canonical wire and storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Resolved
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("'overdue' is derived from the SLA and cannot be set as a status")]
    DerivedOverdue,
    #[error("unknown complaint status '{0}'")]
    Unknown(String),
}

impl FromStr for ComplaintStatus {
    type Err = StatusParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "overdue" => Err(StatusParseError::DerivedOverdue),
            _ => Err(StatusParseError::Unknown(raw.to_string())),
        }
    }
}

impl TryFrom<String> for ComplaintStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComplaintStatus> for String {
    fn from(status: ComplaintStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Click position on the form's map image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel: Option<PixelOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub complaint_id: ComplaintId,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: Location,
    pub photo: Option<PhotoRef>,
    /// Session user that filed the complaint.
    pub reported_by: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub sla_hours: u32,
    pub assigned_to: Option<StaffId>,
}

/// Citizen submission. Every field is optional here so validation can name
/// exactly what is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub sla_hours: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Partial update applied by `ComplaintStore::update`. `None` leaves the
/// stored column as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintPatch {
    pub status: Option<ComplaintStatus>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<StaffId>,
}

impl ComplaintPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.resolved_at.is_none() && self.assigned_to.is_none()
    }
}

/// A complaint as returned to clients: the stored record plus the
/// read-time `overdue` flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub overdue: bool,
}

/// Entry in the fixed complaint category catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub staff_id: StaffId,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

//! SLA evaluation — whether a complaint has outlived its resolution window.
//!
//! `overdue` is never stored. It is recomputed from `created_at`,
//! `sla_hours`, `status` and the caller's `now` on every read.

use crate::complaint::{Complaint, ComplaintStatus};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_SLA_HOURS: u32 = 48;

/// Zero is treated as unset and falls back to the default window.
pub fn effective_sla_hours(hours: u32) -> u32 {
    if hours == 0 {
        DEFAULT_SLA_HOURS
    } else {
        hours
    }
}

/// The instant after which an unresolved complaint is overdue.
/// `None` only if the deadline is past the representable range.
pub fn deadline(complaint: &Complaint) -> Option<DateTime<Utc>> {
    let hours = i64::from(effective_sla_hours(complaint.sla_hours));
    complaint
        .created_at
        .checked_add_signed(Duration::hours(hours))
}

/// Strictly after the deadline; the deadline instant itself is on time.
pub fn is_overdue(complaint: Option<&Complaint>, now: DateTime<Utc>) -> bool {
    let Some(complaint) = complaint else {
        return false;
    };
    if complaint.status == ComplaintStatus::Resolved {
        return false;
    }
    deadline(complaint).is_some_and(|due| now > due)
}

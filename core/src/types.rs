//! Shared primitive types used across the desk.

/// Opaque complaint identifier (`cmp-…`). Assigned once at creation.
pub type ComplaintId = String;

/// Opaque staff identifier (`stf-…`).
pub type StaffId = String;

/// Opaque reference to a stored photo. Never the bytes themselves.
pub type PhotoRef = String;

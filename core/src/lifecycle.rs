//! Complaint lifecycle rules.
//!
//!   Open ──────────► InProgress
//!    │                   │
//!    └──────► Resolved ◄─┘      (terminal)
//!
//! Assignment is orthogonal to status and allowed until Resolved.

use crate::{
    complaint::ComplaintStatus,
    error::{DeskError, DeskResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals current status. Nothing is written.
    Unchanged,
    /// Write the new status; `resolves` means `resolved_at` must be set.
    Apply { resolves: bool },
}

pub fn allowed_targets(from: ComplaintStatus) -> &'static [ComplaintStatus] {
    use ComplaintStatus::*;
    match from {
        Open => &[InProgress, Resolved],
        InProgress => &[Resolved],
        Resolved => &[],
    }
}

pub fn plan_transition(from: ComplaintStatus, to: ComplaintStatus) -> DeskResult<Transition> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    if allowed_targets(from).contains(&to) {
        Ok(Transition::Apply {
            resolves: to == ComplaintStatus::Resolved,
        })
    } else {
        Err(DeskError::InvalidTransition { from, to })
    }
}

pub fn ensure_assignable(status: ComplaintStatus) -> DeskResult<()> {
    if status.is_terminal() {
        return Err(DeskError::Terminal {
            status,
            action: "assign",
        });
    }
    Ok(())
}

//! Explicit request session.
//!
//! RULE: there is no ambient "current user". Every command is dispatched
//! with a `&Session` the caller opened, and the caller closes it when done.
//! How the caller authenticated is outside this crate.

use crate::error::{DeskError, DeskResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Staff,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Citizen => "citizen",
            Role::Staff => "staff",
            Role::Admin => "admin",
        })
    }
}

impl FromStr for Role {
    type Err = DeskError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "citizen" => Ok(Role::Citizen),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(DeskError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn open(user_id: impl Into<String>, role: Role, now: DateTime<Utc>) -> Self {
        let session = Self {
            user_id: user_id.into(),
            role,
            opened_at: now,
        };
        log::info!("session opened user={} role={}", session.user_id, role);
        session
    }

    /// Admins pass every check; everyone else needs the exact role.
    pub fn is_authorized(&self, required: Role) -> bool {
        self.role == Role::Admin || self.role == required
    }

    pub fn authorize(&self, required: Role) -> DeskResult<()> {
        if self.is_authorized(required) {
            Ok(())
        } else {
            log::warn!(
                "user={} role={} denied, requires {required}",
                self.user_id,
                self.role
            );
            Err(DeskError::Forbidden { required })
        }
    }

    pub fn close(self) {
        log::info!("session closed user={}", self.user_id);
    }
}

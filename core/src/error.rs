use crate::{complaint::ComplaintStatus, session::Role};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Cannot {action} a {status} complaint")]
    Terminal {
        status: ComplaintStatus,
        action: &'static str,
    },

    #[error("Forbidden: requires role {required}")]
    Forbidden { required: Role },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Photo storage error: {0}")]
    PhotoStorage(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Machine-checkable category, stable across message wording changes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } | Self::Terminal { .. } => {
                ErrorKind::InvalidTransition
            }
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Serialization(_) | Self::PhotoStorage(_) | Self::Other(_) => {
                ErrorKind::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    Forbidden,
    StoreUnavailable,
    Internal,
}

pub type DeskResult<T> = Result<T, DeskError>;

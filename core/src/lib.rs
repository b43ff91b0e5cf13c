//! Civic complaint desk.
//!
//! Citizens file location-tagged complaints, staff move them through their
//! lifecycle, an admin assigns them, and every read carries a derived
//! SLA `overdue` flag computed against the request's "now".

pub mod clock;
pub mod command;
pub mod complaint;
pub mod config;
pub mod desk;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod photo;
pub mod session;
pub mod sla;
pub mod store;
pub mod types;

//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The desk calls `ComplaintStore` methods — it never executes SQL directly.

use crate::{
    complaint::{Category, Complaint, ComplaintPatch, StaffMember},
    error::DeskResult,
    event::EventLogEntry,
};
use rusqlite::{params, Connection};

mod category;
mod complaint;
mod staff;

/// What the desk needs from persistence. Single-row reads and writes are
/// atomic; there is no cross-call locking or versioning.
pub trait ComplaintStore {
    fn find_all(&self) -> DeskResult<Vec<Complaint>>;

    /// `DeskError::NotFound` if no complaint has this id.
    fn find_by_id(&self, complaint_id: &str) -> DeskResult<Complaint>;

    fn insert(&self, complaint: &Complaint) -> DeskResult<Complaint>;

    /// Apply `patch` and return the stored result.
    /// `DeskError::NotFound` if no complaint has this id.
    fn update(&self, complaint_id: &str, patch: &ComplaintPatch) -> DeskResult<Complaint>;

    /// `DeskError::NotFound` if no staff member has this id.
    fn find_staff(&self, staff_id: &str) -> DeskResult<StaffMember>;

    fn insert_staff(&self, staff: &StaffMember) -> DeskResult<StaffMember>;

    fn list_staff(&self) -> DeskResult<Vec<StaffMember>>;

    /// `DeskError::NotFound` if the catalog has no such category.
    fn find_category(&self, category_id: &str) -> DeskResult<Category>;

    fn list_categories(&self) -> DeskResult<Vec<Category>>;

    fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()>;

    fn events_for(&self, complaint_id: &str) -> DeskResult<Vec<EventLogEntry>>;
}

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_complaints.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event_row(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (complaint_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.complaint_id,
                entry.event_type,
                entry.payload,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn event_rows_for(&self, complaint_id: &str) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, complaint_id, event_type, payload, created_at
             FROM event_log WHERE complaint_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![complaint_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    complaint_id: row.get(1)?,
                    event_type: row.get(2)?,
                    payload: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Total event_log rows (tests and tooling).
    pub fn event_count(&self) -> DeskResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM event_log", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ComplaintStore for DeskStore {
    fn find_all(&self) -> DeskResult<Vec<Complaint>> {
        self.all_complaints()
    }

    fn find_by_id(&self, complaint_id: &str) -> DeskResult<Complaint> {
        self.get_complaint(complaint_id)
    }

    fn insert(&self, complaint: &Complaint) -> DeskResult<Complaint> {
        self.insert_complaint(complaint)?;
        self.get_complaint(&complaint.complaint_id)
    }

    fn update(&self, complaint_id: &str, patch: &ComplaintPatch) -> DeskResult<Complaint> {
        if patch.is_empty() {
            return self.get_complaint(complaint_id);
        }
        self.update_complaint(complaint_id, patch)?;
        self.get_complaint(complaint_id)
    }

    fn find_staff(&self, staff_id: &str) -> DeskResult<StaffMember> {
        self.get_staff(staff_id)
    }

    fn insert_staff(&self, staff: &StaffMember) -> DeskResult<StaffMember> {
        self.insert_staff_row(staff)?;
        self.get_staff(&staff.staff_id)
    }

    fn list_staff(&self) -> DeskResult<Vec<StaffMember>> {
        self.all_staff()
    }

    fn find_category(&self, category_id: &str) -> DeskResult<Category> {
        self.get_category(category_id)
    }

    fn list_categories(&self) -> DeskResult<Vec<Category>> {
        self.all_categories()
    }

    fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.append_event_row(entry)
    }

    fn events_for(&self, complaint_id: &str) -> DeskResult<Vec<EventLogEntry>> {
        self.event_rows_for(complaint_id)
    }
}

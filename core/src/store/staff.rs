use super::DeskStore;
use crate::{
    complaint::StaffMember,
    error::{DeskError, DeskResult},
};
use rusqlite::{params, OptionalExtension};

fn staff_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        staff_id: row.get(0)?,
        full_name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

impl DeskStore {
    // ── Staff ──────────────────────────────────────────────────────

    pub fn insert_staff_row(&self, s: &StaffMember) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO staff (staff_id, full_name, created_at) VALUES (?1, ?2, ?3)",
            params![&s.staff_id, &s.full_name, s.created_at],
        )?;
        Ok(())
    }

    pub fn get_staff(&self, staff_id: &str) -> DeskResult<StaffMember> {
        self.conn
            .query_row(
                "SELECT staff_id, full_name, created_at FROM staff WHERE staff_id = ?1",
                params![staff_id],
                staff_row_mapper,
            )
            .optional()?
            .ok_or_else(|| DeskError::not_found("staff", staff_id))
    }

    pub fn all_staff(&self) -> DeskResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(
            "SELECT staff_id, full_name, created_at FROM staff ORDER BY full_name ASC",
        )?;
        let rows = stmt.query_map([], staff_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

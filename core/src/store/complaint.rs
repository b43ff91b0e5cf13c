use super::DeskStore;
use crate::{
    complaint::{Complaint, ComplaintPatch, ComplaintStatus, Location, PixelOffset},
    error::{DeskError, DeskResult},
};
use rusqlite::{params, types::Type, OptionalExtension};

const COMPLAINT_COLUMNS: &str = "complaint_id, title, description, category_id, city, country,
    lat, lng, pixel_x, pixel_y, photo, reported_by, status, created_at, resolved_at, sla_hours,
    assigned_to";

// Helper function for mapping complaint rows
fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Complaint> {
    let pixel = match (row.get::<_, Option<f64>>(8)?, row.get::<_, Option<f64>>(9)?) {
        (Some(x), Some(y)) => Some(PixelOffset { x, y }),
        _ => None,
    };
    let status: ComplaintStatus = row
        .get::<_, String>(12)?
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e)))?;
    Ok(Complaint {
        complaint_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        city: row.get(4)?,
        country: row.get(5)?,
        location: Location {
            lat: row.get(6)?,
            lng: row.get(7)?,
            pixel,
        },
        photo: row.get(10)?,
        reported_by: row.get(11)?,
        status,
        created_at: row.get(13)?,
        resolved_at: row.get(14)?,
        sla_hours: row.get(15)?,
        assigned_to: row.get(16)?,
    })
}

impl DeskStore {
    // ── Complaint ──────────────────────────────────────────────────

    pub fn insert_complaint(&self, c: &Complaint) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO complaint (
                complaint_id, title, description, category_id, city, country,
                lat, lng, pixel_x, pixel_y, photo, reported_by, status, created_at,
                resolved_at, sla_hours, assigned_to
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                &c.complaint_id,
                &c.title,
                &c.description,
                &c.category_id,
                c.city.as_deref(),
                c.country.as_deref(),
                c.location.lat,
                c.location.lng,
                c.location.pixel.map(|p| p.x),
                c.location.pixel.map(|p| p.y),
                c.photo.as_deref(),
                &c.reported_by,
                c.status.as_str(),
                c.created_at,
                c.resolved_at,
                c.sla_hours,
                c.assigned_to.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn get_complaint(&self, complaint_id: &str) -> DeskResult<Complaint> {
        self.conn
            .query_row(
                &format!("SELECT {COMPLAINT_COLUMNS} FROM complaint WHERE complaint_id = ?1"),
                params![complaint_id],
                complaint_row_mapper,
            )
            .optional()?
            .ok_or_else(|| DeskError::not_found("complaint", complaint_id))
    }

    /// Oldest first; ties keep insertion order.
    pub fn all_complaints(&self) -> DeskResult<Vec<Complaint>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt.query_map([], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Columns left `None` in the patch keep their stored value.
    pub fn update_complaint(&self, complaint_id: &str, patch: &ComplaintPatch) -> DeskResult<()> {
        let changed = self.conn.execute(
            "UPDATE complaint SET
                status      = COALESCE(?1, status),
                resolved_at = COALESCE(?2, resolved_at),
                assigned_to = COALESCE(?3, assigned_to)
             WHERE complaint_id = ?4",
            params![
                patch.status.map(ComplaintStatus::as_str),
                patch.resolved_at,
                patch.assigned_to.as_deref(),
                complaint_id,
            ],
        )?;
        if changed == 0 {
            return Err(DeskError::not_found("complaint", complaint_id));
        }
        Ok(())
    }

    pub fn complaint_count(&self) -> DeskResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM complaint", [], |row| row.get(0))?;
        Ok(count)
    }
}

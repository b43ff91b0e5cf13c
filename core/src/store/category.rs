use super::DeskStore;
use crate::{
    complaint::Category,
    error::{DeskError, DeskResult},
};
use rusqlite::{params, OptionalExtension};

fn category_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        category_id: row.get(0)?,
        name: row.get(1)?,
    })
}

impl DeskStore {
    // ── Category catalog ───────────────────────────────────────────

    pub fn get_category(&self, category_id: &str) -> DeskResult<Category> {
        self.conn
            .query_row(
                "SELECT category_id, name FROM category WHERE category_id = ?1",
                params![category_id],
                category_row_mapper,
            )
            .optional()?
            .ok_or_else(|| DeskError::not_found("category", category_id))
    }

    /// Catalog order (`cat1` … `cat9`).
    pub fn all_categories(&self) -> DeskResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category_id, name FROM category ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], category_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

//! The complaint desk — lifecycle operations over the store.
//!
//! Every operation reads "now" once from the injected clock and uses that
//! single instant for timestamps and the derived `overdue` flag.
//! Failed operations leave the store exactly as they found it.

use crate::{
    clock::{Clock, FixedClock, SystemClock},
    complaint::{
        Category, Complaint, ComplaintPatch, ComplaintStatus, ComplaintView, Location, NewComplaint,
        PhotoUpload, StaffMember,
    },
    config::DeskConfig,
    error::{DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
    lifecycle::{self, Transition},
    photo::{DiskPhotoStore, MemoryPhotoStore, PhotoStore},
    sla,
    store::{ComplaintStore, DeskStore},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Heatmap point: `[lat, lng, weight]` with weight 1 per complaint,
/// so density alone drives intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint(pub f64, pub f64, pub f64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub complaint_id: String,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub heat: Vec<HeatPoint>,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeskSummary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub overdue: usize,
    pub unassigned: usize,
}

pub struct ComplaintDesk<S: ComplaintStore = DeskStore> {
    store: S,
    clock: Box<dyn Clock>,
    photos: Box<dyn PhotoStore>,
    config: DeskConfig,
}

impl ComplaintDesk<DeskStore> {
    /// Open the configured database and photo directory, migrated and ready.
    pub fn build(config: DeskConfig) -> DeskResult<Self> {
        let store = DeskStore::open(&config.db_path)?;
        store.migrate()?;
        let photos: Box<dyn PhotoStore> = if config.photo_dir.is_empty() {
            Box::new(MemoryPhotoStore::new())
        } else {
            Box::new(DiskPhotoStore::open(&config.photo_dir)?)
        };
        Ok(Self::new(store, Box::new(SystemClock), photos, config))
    }

    /// In-memory store, in-memory photos, clock frozen at `at`.
    /// Returns the clock handle so tests can move time.
    pub fn build_test(at: DateTime<Utc>) -> DeskResult<(Self, Arc<FixedClock>)> {
        let store = DeskStore::in_memory()?;
        store.migrate()?;
        let clock = Arc::new(FixedClock::new(at));
        let desk = Self::new(
            store,
            Box::new(Arc::clone(&clock)),
            Box::new(MemoryPhotoStore::new()),
            DeskConfig::default_test(),
        );
        Ok((desk, clock))
    }
}

impl<S: ComplaintStore> ComplaintDesk<S> {
    pub fn new(
        store: S,
        clock: Box<dyn Clock>,
        photos: Box<dyn PhotoStore>,
        config: DeskConfig,
    ) -> Self {
        Self {
            store,
            clock,
            photos,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn view(complaint: Complaint, now: DateTime<Utc>) -> ComplaintView {
        let overdue = sla::is_overdue(Some(&complaint), now);
        ComplaintView { complaint, overdue }
    }

    /// Audit is best-effort: the complaint write already succeeded.
    fn record(&self, event: DeskEvent) {
        let result = EventLogEntry::from_event(&event)
            .map_err(DeskError::from)
            .and_then(|entry| self.store.append_event(&entry));
        if let Err(e) = result {
            log::warn!(
                "failed to record {} for {}: {e}",
                event.type_name(),
                event.complaint_id()
            );
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn list_complaints(&self) -> DeskResult<Vec<ComplaintView>> {
        let now = self.now();
        Ok(self
            .store
            .find_all()?
            .into_iter()
            .map(|c| Self::view(c, now))
            .collect())
    }

    pub fn get_complaint(&self, complaint_id: &str) -> DeskResult<ComplaintView> {
        let now = self.now();
        Ok(Self::view(self.store.find_by_id(complaint_id)?, now))
    }

    pub fn map_layer(&self) -> DeskResult<MapLayer> {
        let views = self.list_complaints()?;
        let heat = views
            .iter()
            .map(|v| HeatPoint(v.complaint.location.lat, v.complaint.location.lng, 1.0))
            .collect();
        let markers = views
            .into_iter()
            .map(|v| MapMarker {
                lat: v.complaint.location.lat,
                lng: v.complaint.location.lng,
                complaint_id: v.complaint.complaint_id,
                title: v.complaint.title,
                description: v.complaint.description,
                status: v.complaint.status,
                overdue: v.overdue,
            })
            .collect();
        Ok(MapLayer { heat, markers })
    }

    pub fn summary(&self) -> DeskResult<DeskSummary> {
        let mut summary = DeskSummary::default();
        for view in self.list_complaints()? {
            summary.total += 1;
            match view.complaint.status {
                ComplaintStatus::Open => summary.open += 1,
                ComplaintStatus::InProgress => summary.in_progress += 1,
                ComplaintStatus::Resolved => summary.resolved += 1,
            }
            if view.overdue {
                summary.overdue += 1;
            }
            if view.complaint.assigned_to.is_none() && !view.complaint.status.is_terminal() {
                summary.unassigned += 1;
            }
        }
        log::debug!(
            "summary total={} open={} in_progress={} resolved={} overdue={}",
            summary.total,
            summary.open,
            summary.in_progress,
            summary.resolved,
            summary.overdue,
        );
        Ok(summary)
    }

    pub fn events_for(&self, complaint_id: &str) -> DeskResult<Vec<DeskEvent>> {
        self.store.find_by_id(complaint_id)?;
        self.store
            .events_for(complaint_id)?
            .iter()
            .map(|entry| entry.decode().map_err(DeskError::from))
            .collect()
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// `reported_by` is the filing session's user id.
    pub fn create_complaint(
        &self,
        reported_by: &str,
        fields: NewComplaint,
        photo: Option<PhotoUpload>,
    ) -> DeskResult<Complaint> {
        let (title, description, category_id, location) = validate_new(&fields)?;
        self.store
            .find_category(&category_id)
            .map_err(|e| match e {
                DeskError::NotFound { .. } => {
                    DeskError::Validation(format!("unknown category '{category_id}'"))
                }
                other => other,
            })?;
        let now = self.now();

        let photo_ref = match &photo {
            Some(upload) => Some(self.photos.store(&upload.bytes, &upload.filename)?),
            None => None,
        };

        let complaint = Complaint {
            complaint_id: format!("cmp-{}", Uuid::new_v4().simple()),
            title,
            description,
            category_id,
            city: non_blank(fields.city),
            country: non_blank(fields.country),
            location,
            photo: photo_ref,
            reported_by: reported_by.to_string(),
            status: ComplaintStatus::Open,
            created_at: now,
            resolved_at: None,
            sla_hours: match fields.sla_hours {
                Some(hours) if hours > 0 => hours,
                _ => self.config.default_sla_hours,
            },
            assigned_to: None,
        };

        let stored = match self.store.insert(&complaint) {
            Ok(stored) => stored,
            Err(e) => {
                if let Some(photo) = &complaint.photo {
                    if let Err(discard) = self.photos.discard(photo) {
                        log::warn!("orphaned photo {photo}: {discard}");
                    }
                }
                return Err(e);
            }
        };

        log::info!(
            "complaint filed id={} category={} sla_hours={}",
            stored.complaint_id,
            stored.category_id,
            stored.sla_hours
        );
        self.record(DeskEvent::ComplaintFiled {
            at: now,
            complaint_id: stored.complaint_id.clone(),
            category_id: stored.category_id.clone(),
            reported_by: stored.reported_by.clone(),
            sla_hours: stored.sla_hours,
        });
        Ok(stored)
    }

    pub fn update_status(
        &self,
        complaint_id: &str,
        target: ComplaintStatus,
    ) -> DeskResult<Complaint> {
        let current = self.store.find_by_id(complaint_id)?;
        let transition = lifecycle::plan_transition(current.status, target).inspect_err(|_| {
            log::warn!(
                "rejected transition {} -> {target} for {complaint_id}",
                current.status
            );
        })?;

        let resolves = match transition {
            Transition::Unchanged => return Ok(current),
            Transition::Apply { resolves } => resolves,
        };

        let now = self.now();
        let patch = ComplaintPatch {
            status: Some(target),
            resolved_at: resolves.then_some(now),
            ..ComplaintPatch::default()
        };
        let updated = self.store.update(complaint_id, &patch)?;

        log::info!("complaint {complaint_id}: {} -> {target}", current.status);
        self.record(DeskEvent::StatusChanged {
            at: now,
            complaint_id: complaint_id.to_string(),
            from: current.status,
            to: target,
        });
        Ok(updated)
    }

    pub fn assign(&self, complaint_id: &str, staff_id: &str) -> DeskResult<Complaint> {
        let now = self.now();
        let current = self.store.find_by_id(complaint_id)?;
        self.store.find_staff(staff_id)?;
        lifecycle::ensure_assignable(current.status)?;

        let patch = ComplaintPatch {
            assigned_to: Some(staff_id.to_string()),
            ..ComplaintPatch::default()
        };
        let updated = self.store.update(complaint_id, &patch)?;

        log::info!("complaint {complaint_id} assigned to {staff_id}");
        self.record(DeskEvent::ComplaintAssigned {
            at: now,
            complaint_id: complaint_id.to_string(),
            staff_id: staff_id.to_string(),
            previous: current.assigned_to,
        });
        Ok(updated)
    }

    // ── Staff ──────────────────────────────────────────────────────

    pub fn register_staff(&self, full_name: &str) -> DeskResult<StaffMember> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(DeskError::Validation("full_name is required".into()));
        }
        let staff = StaffMember {
            staff_id: format!("stf-{}", Uuid::new_v4().simple()),
            full_name: full_name.to_string(),
            created_at: self.now(),
        };
        let stored = self.store.insert_staff(&staff)?;
        log::info!("staff registered id={}", stored.staff_id);
        Ok(stored)
    }

    pub fn list_staff(&self) -> DeskResult<Vec<StaffMember>> {
        self.store.list_staff()
    }

    pub fn list_categories(&self) -> DeskResult<Vec<Category>> {
        self.store.list_categories()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the required fields, trimmed, or a Validation error naming
/// every missing one.
fn validate_new(fields: &NewComplaint) -> DeskResult<(String, String, String, Location)> {
    let mut missing = Vec::new();
    let title = non_blank(fields.title.clone());
    let description = non_blank(fields.description.clone());
    let category_id = non_blank(fields.category_id.clone());
    if title.is_none() {
        missing.push("title");
    }
    if description.is_none() {
        missing.push("description");
    }
    if category_id.is_none() {
        missing.push("category_id");
    }
    if fields.location.is_none() {
        missing.push("location");
    }

    match (title, description, category_id, fields.location) {
        (Some(title), Some(description), Some(category_id), Some(location)) => {
            validate_location(&location)?;
            Ok((title, description, category_id, location))
        }
        _ => Err(DeskError::Validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        ))),
    }
}

fn validate_location(location: &Location) -> DeskResult<()> {
    let Location { lat, lng, .. } = *location;
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(DeskError::Validation(format!("latitude {lat} out of range")));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(DeskError::Validation(format!("longitude {lng} out of range")));
    }
    Ok(())
}

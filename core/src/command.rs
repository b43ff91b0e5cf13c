use crate::{
    complaint::{ComplaintStatus, NewComplaint, PhotoUpload},
    desk::ComplaintDesk,
    error::{DeskError, DeskResult, ErrorKind},
    session::{Role, Session},
    store::ComplaintStore,
    types::{ComplaintId, StaffId},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every request the desk accepts.
/// Variants are only ever added, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DeskCommand {
    // ── Citizen / public ──────────────────────────
    ListComplaints,
    GetComplaint {
        complaint_id: ComplaintId,
    },
    CreateComplaint {
        #[serde(flatten)]
        fields: NewComplaint,
        #[serde(default)]
        photo: Option<PhotoUpload>,
    },
    MapLayer,
    Summary,
    ListCategories,

    // ── Staff ─────────────────────────────────────
    UpdateStatus {
        complaint_id: ComplaintId,
        status: ComplaintStatus,
    },
    Events {
        complaint_id: ComplaintId,
    },

    // ── Admin ─────────────────────────────────────
    Assign {
        complaint_id: ComplaintId,
        staff_id: StaffId,
    },
    RegisterStaff {
        full_name: String,
    },
    ListStaff,
}

impl DeskCommand {
    /// `None` means any session may run it.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            DeskCommand::ListComplaints
            | DeskCommand::GetComplaint { .. }
            | DeskCommand::CreateComplaint { .. }
            | DeskCommand::MapLayer
            | DeskCommand::Summary
            | DeskCommand::ListCategories => None,
            DeskCommand::UpdateStatus { .. } | DeskCommand::Events { .. } => Some(Role::Staff),
            DeskCommand::Assign { .. }
            | DeskCommand::RegisterStaff { .. }
            | DeskCommand::ListStaff => Some(Role::Admin),
        }
    }
}

/// Authorize, then run. Authorization failures never touch the store.
pub fn dispatch<S: ComplaintStore>(
    desk: &ComplaintDesk<S>,
    session: &Session,
    command: DeskCommand,
) -> DeskResult<Value> {
    if let Some(required) = command.required_role() {
        session.authorize(required)?;
    }

    let value = match command {
        DeskCommand::ListComplaints => serde_json::to_value(desk.list_complaints()?)?,
        DeskCommand::GetComplaint { complaint_id } => {
            serde_json::to_value(desk.get_complaint(&complaint_id)?)?
        }
        DeskCommand::CreateComplaint { fields, photo } => {
            let created = desk.create_complaint(&session.user_id, fields, photo)?;
            serde_json::to_value(desk.get_complaint(&created.complaint_id)?)?
        }
        DeskCommand::MapLayer => serde_json::to_value(desk.map_layer()?)?,
        DeskCommand::Summary => serde_json::to_value(desk.summary()?)?,
        DeskCommand::ListCategories => serde_json::to_value(desk.list_categories()?)?,
        DeskCommand::UpdateStatus {
            complaint_id,
            status,
        } => {
            desk.update_status(&complaint_id, status)?;
            serde_json::to_value(desk.get_complaint(&complaint_id)?)?
        }
        DeskCommand::Events { complaint_id } => {
            serde_json::to_value(desk.events_for(&complaint_id)?)?
        }
        DeskCommand::Assign {
            complaint_id,
            staff_id,
        } => {
            desk.assign(&complaint_id, &staff_id)?;
            serde_json::to_value(desk.get_complaint(&complaint_id)?)?
        }
        DeskCommand::RegisterStaff { full_name } => {
            serde_json::to_value(desk.register_staff(&full_name)?)?
        }
        DeskCommand::ListStaff => serde_json::to_value(desk.list_staff()?)?,
    };
    Ok(value)
}

/// Handle one raw request line. Blank lines yield no reply; undecodable
/// bytes or JSON become a validation failure so the caller keeps reading.
pub fn reply_to_line<S: ComplaintStore>(
    desk: &ComplaintDesk<S>,
    session: &Session,
    line: &[u8],
) -> Option<DeskReply> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => {
            log::warn!("rejecting non-UTF-8 request line: {e}");
            return Some(DeskReply::failure(&DeskError::Validation(format!(
                "request is not valid UTF-8: {e}"
            ))));
        }
    };
    if text.is_empty() {
        return None;
    }
    let reply = match serde_json::from_str::<DeskCommand>(text) {
        Ok(command) => DeskReply::from_result(dispatch(desk, session, command)),
        Err(e) => DeskReply::failure(&DeskError::Validation(format!("bad command: {e}"))),
    };
    Some(reply)
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// One reply line: `{"ok":true,"data":…}` or `{"ok":false,"error":{…}}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeskReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl DeskReply {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &DeskError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }

    pub fn from_result(result: DeskResult<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e),
        }
    }
}

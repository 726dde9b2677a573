//! Moderation lifecycle of a note.
//!
//! ```text
//! PENDING ──approve──▶ APPROVED
//!    │
//!    └────reject────▶ REJECTED
//! ```
//!
//! Only `APPROVED` notes are publicly visible. The approve/reject transition
//! applies to `PENDING` notes only; the admin update can still set any status.

use std::fmt;
use std::str::FromStr;

use crate::modules::accounts::Role;
use crate::modules::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStatus {
    Pending,
    Approved,
    Rejected,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Pending => "PENDING",
            NoteStatus::Approved => "APPROVED",
            NoteStatus::Rejected => "REJECTED",
        }
    }

    /// Status a new note starts in.
    pub fn initial_for(role: Role) -> Self {
        match role {
            Role::Admin => NoteStatus::Approved,
            Role::Student => NoteStatus::Pending,
        }
    }

    pub fn apply(self, action: ModerationAction) -> Result<NoteStatus, ServiceError> {
        match (self, action) {
            (NoteStatus::Pending, ModerationAction::Approve) => Ok(NoteStatus::Approved),
            (NoteStatus::Pending, ModerationAction::Reject) => Ok(NoteStatus::Rejected),
            (current, _) => Err(ServiceError::Conflict(format!(
                "Note has already been moderated ({current})"
            ))),
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(NoteStatus::Pending),
            "APPROVED" => Ok(NoteStatus::Approved),
            "REJECTED" => Ok(NoteStatus::Rejected),
            other => Err(ServiceError::unprocessable(format!("Unknown status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl FromStr for ModerationAction {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ModerationAction::Approve),
            "reject" => Ok(ModerationAction::Reject),
            other => Err(ServiceError::unprocessable(format!(
                "Invalid action '{other}', expected 'approve' or 'reject'"
            ))),
        }
    }
}

//! The generic approval life cycle.
//!
//! One pending → approved/rejected state machine serves every
//! approval-gated entity: scanned check-ins, enrollment requests,
//! membership requests, and account activations. Entity-specific side
//! effects live with the caller; this module owns only the transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of entity an approval request targets.
///
/// Wire format: `u8` (0 = Enrollment, 1 = Membership, 2 = Activation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    /// Student requesting enrollment into a course.
    Enrollment = 0,
    /// User requesting membership in a school.
    Membership = 1,
    /// Freshly registered account awaiting activation.
    Activation = 2,
}

impl ApprovalKind {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Enrollment),
            1 => Some(Self::Membership),
            2 => Some(Self::Activation),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse the snake_case form used in query strings.
    pub fn from_snake_case(s: &str) -> Option<Self> {
        match s {
            "enrollment" => Some(Self::Enrollment),
            "membership" => Some(Self::Membership),
            "activation" => Some(Self::Activation),
            _ => None,
        }
    }
}

/// Life-cycle state of an approval request.
///
/// Wire format: `u8` (0 = Pending, 1 = Approved, 2 = Rejected).
/// Transitions are one-way: a decided request never returns to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl ApprovalStatus {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse the snake_case form used in query strings.
    pub fn from_snake_case(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A reviewer's verdict. There is no "back to pending" outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalOutcome {
    Approved,
    Rejected,
}

impl ApprovalOutcome {
    /// The status a request lands in when this outcome is applied.
    pub fn as_status(self) -> ApprovalStatus {
        match self {
            Self::Approved => ApprovalStatus::Approved,
            Self::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// The applied transition: new status plus the reviewer audit stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub status: ApprovalStatus,
    pub reviewer_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
}

/// The request was already approved or rejected; decisions are one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("already decided")]
pub struct AlreadyDecided;

/// Apply a reviewer verdict to the current status.
///
/// Only a pending request may move. Persistence must enforce the same
/// precondition atomically (conditional update on pending); this function
/// is the in-memory half of that contract.
pub fn decide(
    current: ApprovalStatus,
    outcome: ApprovalOutcome,
    reviewer_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Decision, AlreadyDecided> {
    if !current.is_pending() {
        return Err(AlreadyDecided);
    }
    Ok(Decision {
        status: outcome.as_status(),
        reviewer_id,
        reviewed_at: now,
    })
}

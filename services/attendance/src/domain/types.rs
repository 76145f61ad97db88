use chrono::{DateTime, Utc};
use uuid::Uuid;

use rollcall_domain::approval::{ApprovalKind, ApprovalStatus};
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};

/// Account record mirrored into the attendance service.
/// Carries no role; the caller's role always comes from the gateway.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub school_id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A scheduled class meeting plus its check-in window state.
///
/// `window_expires_at` is set iff `window_open`. A session outlives its
/// window and may open a fresh one later.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub window_open: bool,
    pub window_expires_at: Option<DateTime<Utc>>,
    pub window_secs: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the check-in window is open and unexpired at `now`.
    ///
    /// An open flag with a lapsed expiry counts as closed even before the
    /// sweeper flips the flag.
    pub fn window_is_open(&self, now: DateTime<Utc>) -> bool {
        self.window_open && self.window_expires_at.is_some_and(|exp| exp > now)
    }
}

/// One student's attendance outcome for one session. At most one per
/// (session, student); intake upserts, decisions flip the status. A
/// rejection clears `method` and `checked_in_at`, as if the check-in
/// had never happened.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub method: Option<CheckInMethod>,
    pub status: AttendanceStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of one approval workflow item.
/// Reviewer fields are `None` iff the request is still pending.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub id: Uuid,
    pub kind: ApprovalKind,
    pub subject_id: Uuid,
    pub target_id: Uuid,
    pub status: ApprovalStatus,
    pub requested_at: DateTime<Utc>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// An enrolled student as the roster sees them (enrollment joined with name).
#[derive(Debug, Clone)]
pub struct RosterStudent {
    pub user_id: Uuid,
    pub name: String,
}

/// One roster line: the student plus their rendered attendance state.
#[derive(Debug, Clone)]
pub struct RosterRow {
    pub student_id: Uuid,
    pub name: String,
    pub method: Option<CheckInMethod>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
}

/// Per-status tallies over a roster. Always sums to the roster size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterCounts {
    pub verified: usize,
    pub pending: usize,
    pub absent: usize,
}

#[derive(Debug, Clone)]
pub struct RosterView {
    pub rows: Vec<RosterRow>,
    pub counts: RosterCounts,
}

/// Window length applied when an open request names none.
pub const DEFAULT_WINDOW_SECS: i64 = 300;

/// Shortest permitted check-in window.
pub const MIN_WINDOW_SECS: i64 = 30;

/// Longest permitted check-in window.
pub const MAX_WINDOW_SECS: i64 = 3600;

/// Minimal shape check: one `@` with nonempty local and domain parts.
/// Anything stricter is the identity provider's business.
pub fn validate_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

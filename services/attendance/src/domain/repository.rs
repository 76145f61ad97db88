#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rollcall_domain::approval::{ApprovalKind, ApprovalStatus};

use crate::domain::types::{
    Account, ApprovalRequest, AttendanceRecord, Course, RosterStudent, School, Session,
};
use crate::error::AttendanceServiceError;

/// Repository for class sessions and their check-in window state.
///
/// The window mutators are compare-and-set: each is a single conditional
/// update keyed by session id, returning `false` when the precondition no
/// longer held (the caller lost a race and reports the matching conflict).
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AttendanceServiceError>;

    async fn create(&self, session: &Session) -> Result<(), AttendanceServiceError>;

    async fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<Session>, AttendanceServiceError>;

    /// Open the window: only succeeds while it is closed or already lapsed.
    async fn open_window(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
        window_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError>;

    /// Advance the expiry: only succeeds while the window is open and unexpired.
    async fn refresh_window(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError>;

    /// Close the window and clear its expiry. Idempotent.
    async fn close_window(&self, id: Uuid) -> Result<(), AttendanceServiceError>;

    /// Close every window whose expiry lapsed without a refresh.
    /// Returns the number of windows closed.
    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError>;
}

/// Repository for per-(session, student) attendance outcomes.
pub trait AttendanceRecordRepository: Send + Sync {
    async fn find(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;

    async fn list_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;

    /// Upsert the record inside a transaction that re-checks the session
    /// window against `now`. Returns `false` when the window closed meanwhile;
    /// nothing is written in that case.
    async fn upsert_in_window(
        &self,
        record: &AttendanceRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError>;

    /// Write the decided fields, but only while the record is still pending.
    /// Returns `false` when another reviewer won the race.
    async fn decide_if_pending(
        &self,
        decided: &AttendanceRecord,
    ) -> Result<bool, AttendanceServiceError>;
}

/// Repository for the approval request audit trail.
pub trait ApprovalRequestRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ApprovalRequest>, AttendanceServiceError>;

    async fn create(&self, request: &ApprovalRequest) -> Result<(), AttendanceServiceError>;

    /// Whether a pending request for the same (kind, subject, target) exists.
    async fn has_pending(
        &self,
        kind: ApprovalKind,
        subject_id: Uuid,
        target_id: Uuid,
    ) -> Result<bool, AttendanceServiceError>;

    /// Write the decided fields, but only while the request is still pending.
    /// Returns `false` when another reviewer won the race.
    async fn decide_if_pending(
        &self,
        decided: &ApprovalRequest,
    ) -> Result<bool, AttendanceServiceError>;

    async fn list(
        &self,
        kind: Option<ApprovalKind>,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRequest>, AttendanceServiceError>;
}

/// Repository for course rosters. Rows appear only through approved
/// enrollment requests.
pub trait EnrollmentRepository: Send + Sync {
    /// Idempotent: adding an existing (course, user) pair is a no-op.
    async fn add(&self, course_id: Uuid, user_id: Uuid) -> Result<(), AttendanceServiceError>;

    async fn exists(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AttendanceServiceError>;

    /// Enrolled students joined with their account names.
    async fn list_students(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<RosterStudent>, AttendanceServiceError>;
}

/// Repository for school memberships. Rows appear only through approved
/// membership requests.
pub trait MembershipRepository: Send + Sync {
    /// Idempotent: adding an existing (school, user) pair is a no-op.
    async fn add(&self, school_id: Uuid, user_id: Uuid) -> Result<(), AttendanceServiceError>;

    async fn exists(
        &self,
        school_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AttendanceServiceError>;
}

/// Repository for user accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AttendanceServiceError>;

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, AttendanceServiceError>;

    /// Insert the account and its pending activation request atomically
    /// (same transaction).
    async fn create_with_request(
        &self,
        account: &Account,
        request: &ApprovalRequest,
    ) -> Result<(), AttendanceServiceError>;

    /// Flip the account active. Idempotent.
    async fn activate(&self, id: Uuid) -> Result<(), AttendanceServiceError>;
}

/// Repository for courses.
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AttendanceServiceError>;

    async fn find_by_code(&self, code: &str)
    -> Result<Option<Course>, AttendanceServiceError>;

    async fn create(&self, course: &Course) -> Result<(), AttendanceServiceError>;
}

/// Repository for schools.
pub trait SchoolRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AttendanceServiceError>;

    async fn create(&self, school: &School) -> Result<(), AttendanceServiceError>;
}

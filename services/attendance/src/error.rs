use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Attendance service domain error variants.
///
/// State conflicts (409) are definitive outcomes, never retried internally;
/// the caller decides whether to re-prompt (e.g. re-scan a fresh pass after
/// `PASS_EXPIRED`). Transient persistence failures arrive wrapped in
/// `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("malformed check-in pass")]
    MalformedPass,
    #[error("window length out of range")]
    InvalidWindow,
    #[error("invalid email")]
    InvalidEmail,
    #[error("session ends before it starts")]
    InvalidSchedule,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("session not found")]
    SessionNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("school not found")]
    SchoolNotFound,
    #[error("account not found")]
    AccountNotFound,
    #[error("attendance record not found")]
    RecordNotFound,
    #[error("approval request not found")]
    RequestNotFound,
    #[error("check-in window already open")]
    WindowAlreadyOpen,
    #[error("check-in window closed")]
    WindowClosed,
    #[error("check-in pass expired")]
    PassExpired,
    #[error("pass does not match session")]
    PassMismatch,
    #[error("already decided")]
    AlreadyDecided,
    #[error("duplicate pending request")]
    DuplicateRequest,
    #[error("already enrolled")]
    AlreadyEnrolled,
    #[error("already a member")]
    AlreadyMember,
    #[error("account already active")]
    AlreadyActive,
    #[error("email already taken")]
    EmailTaken,
    #[error("course code already taken")]
    CourseCodeTaken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPass => "MALFORMED_PASS",
            Self::InvalidWindow => "INVALID_WINDOW",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::SchoolNotFound => "SCHOOL_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::WindowAlreadyOpen => "WINDOW_ALREADY_OPEN",
            Self::WindowClosed => "WINDOW_CLOSED",
            Self::PassExpired => "PASS_EXPIRED",
            Self::PassMismatch => "PASS_MISMATCH",
            Self::AlreadyDecided => "ALREADY_DECIDED",
            Self::DuplicateRequest => "DUPLICATE_REQUEST",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::CourseCodeTaken => "COURSE_CODE_TAKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MalformedPass
            | Self::InvalidWindow
            | Self::InvalidEmail
            | Self::InvalidSchedule
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::SessionNotFound
            | Self::StudentNotFound
            | Self::CourseNotFound
            | Self::SchoolNotFound
            | Self::AccountNotFound
            | Self::RecordNotFound
            | Self::RequestNotFound => StatusCode::NOT_FOUND,
            Self::WindowAlreadyOpen
            | Self::WindowClosed
            | Self::PassExpired
            | Self::PassMismatch
            | Self::AlreadyDecided
            | Self::DuplicateRequest
            | Self::AlreadyEnrolled
            | Self::AlreadyMember
            | Self::AlreadyActive
            | Self::EmailTaken
            | Self::CourseCodeTaken => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only. The TraceLayer already records method/uri/status for
        // every request, and 4xx are expected client outcomes. Internal errors
        // carry the anyhow chain so the root cause stays traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

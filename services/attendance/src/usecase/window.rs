//! Session check-in window life cycle: open, refresh, close.
//!
//! The window is the only gate on intake. While it is open the current pass
//! rotates on every refresh; a refresh supersedes the previous pass without
//! invalidating it early, which is what keeps the projected code fresh
//! without ever exposing one long-lived credential.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use rollcall_auth_types::pass::{CheckInPass, encode_pass};

use crate::domain::repository::{CourseRepository, SessionRepository};
use crate::domain::types::{
    Course, DEFAULT_WINDOW_SECS, MAX_WINDOW_SECS, MIN_WINDOW_SECS, Session,
};
use crate::error::AttendanceServiceError;

/// What an instructor gets back from open/refresh: the encoded pass to hand
/// to the code renderer plus the moment both it and the window lapse.
#[derive(Debug, Clone)]
pub struct WindowGrant {
    pub pass_payload: String,
    pub expires_at: DateTime<Utc>,
}

fn mint_pass(
    session: &Session,
    course: &Course,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> String {
    encode_pass(&CheckInPass {
        session_id: session.id,
        course_id: course.id,
        course_code: course.code.clone(),
        course_name: course.name.clone(),
        issued_at,
        expires_at,
    })
}

pub struct OpenWindowInput {
    pub session_id: Uuid,
    /// Window length; `None` applies `DEFAULT_WINDOW_SECS`.
    pub window_secs: Option<i64>,
}

pub struct OpenWindowUseCase<S, C>
where
    S: SessionRepository,
    C: CourseRepository,
{
    pub sessions: S,
    pub courses: C,
}

impl<S, C> OpenWindowUseCase<S, C>
where
    S: SessionRepository,
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        input: OpenWindowInput,
    ) -> Result<WindowGrant, AttendanceServiceError> {
        let window_secs = input.window_secs.unwrap_or(DEFAULT_WINDOW_SECS);
        if !(MIN_WINDOW_SECS..=MAX_WINDOW_SECS).contains(&window_secs) {
            return Err(AttendanceServiceError::InvalidWindow);
        }

        let session = self
            .sessions
            .find_by_id(input.session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;
        let course = self
            .courses
            .find_by_id(session.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;

        let now = Utc::now();
        let expires_at = now + Duration::seconds(window_secs);

        // CAS on the open flag; losing it means a window is already running.
        let opened = self
            .sessions
            .open_window(session.id, expires_at, window_secs, now)
            .await?;
        if !opened {
            return Err(AttendanceServiceError::WindowAlreadyOpen);
        }

        Ok(WindowGrant {
            pass_payload: mint_pass(&session, &course, now, expires_at),
            expires_at,
        })
    }
}

pub struct RefreshWindowInput {
    pub session_id: Uuid,
}

pub struct RefreshWindowUseCase<S, C>
where
    S: SessionRepository,
    C: CourseRepository,
{
    pub sessions: S,
    pub courses: C,
}

impl<S, C> RefreshWindowUseCase<S, C>
where
    S: SessionRepository,
    C: CourseRepository,
{
    /// Advance the open window by its stored length and mint the next pass.
    /// The previous pass stays valid until its own expiry.
    pub async fn execute(
        &self,
        input: RefreshWindowInput,
    ) -> Result<WindowGrant, AttendanceServiceError> {
        let session = self
            .sessions
            .find_by_id(input.session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;
        let course = self
            .courses
            .find_by_id(session.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;

        let now = Utc::now();
        if !session.window_is_open(now) {
            return Err(AttendanceServiceError::WindowClosed);
        }

        let expires_at = now + Duration::seconds(session.window_secs);
        let refreshed = self
            .sessions
            .refresh_window(session.id, expires_at, now)
            .await?;
        if !refreshed {
            return Err(AttendanceServiceError::WindowClosed);
        }

        Ok(WindowGrant {
            pass_payload: mint_pass(&session, &course, now, expires_at),
            expires_at,
        })
    }
}

pub struct CloseWindowInput {
    pub session_id: Uuid,
}

pub struct CloseWindowUseCase<S>
where
    S: SessionRepository,
{
    pub sessions: S,
}

impl<S> CloseWindowUseCase<S>
where
    S: SessionRepository,
{
    /// Close the window. Closing an already-closed window is a no-op.
    pub async fn execute(&self, input: CloseWindowInput) -> Result<(), AttendanceServiceError> {
        self.sessions
            .find_by_id(input.session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;
        self.sessions.close_window(input.session_id).await?;
        Ok(())
    }
}

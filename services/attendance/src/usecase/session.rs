//! Session provisioning and the instructor dashboard read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{CourseRepository, SessionRepository};
use crate::domain::types::{DEFAULT_WINDOW_SECS, Session};
use crate::error::AttendanceServiceError;

pub struct CreateSessionInput {
    pub course_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

pub struct CreateSessionUseCase<C, S>
where
    C: CourseRepository,
    S: SessionRepository,
{
    pub courses: C,
    pub sessions: S,
}

impl<C, S> CreateSessionUseCase<C, S>
where
    C: CourseRepository,
    S: SessionRepository,
{
    /// Create a session with its window closed.
    pub async fn execute(
        &self,
        input: CreateSessionInput,
    ) -> Result<Session, AttendanceServiceError> {
        if input.ends_at <= input.starts_at {
            return Err(AttendanceServiceError::InvalidSchedule);
        }
        self.courses
            .find_by_id(input.course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;

        let session = Session {
            id: Uuid::new_v4(),
            course_id: input.course_id,
            title: input.title,
            location: input.location,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            window_open: false,
            window_expires_at: None,
            window_secs: DEFAULT_WINDOW_SECS,
            created_at: Utc::now(),
        };
        self.sessions.create(&session).await?;
        Ok(session)
    }
}

pub struct ListSessionsUseCase<C, S>
where
    C: CourseRepository,
    S: SessionRepository,
{
    pub courses: C,
    pub sessions: S,
}

impl<C, S> ListSessionsUseCase<C, S>
where
    C: CourseRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, course_id: Uuid) -> Result<Vec<Session>, AttendanceServiceError> {
        self.courses
            .find_by_id(course_id)
            .await?
            .ok_or(AttendanceServiceError::CourseNotFound)?;
        self.sessions.list_by_course(course_id).await
    }
}

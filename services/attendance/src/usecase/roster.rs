//! Roster projection: enrolled students joined with their attendance state.

use std::collections::HashMap;

use uuid::Uuid;

use rollcall_domain::attendance::AttendanceStatus;

use crate::domain::repository::{
    AttendanceRecordRepository, EnrollmentRepository, SessionRepository,
};
use crate::domain::types::{AttendanceRecord, RosterCounts, RosterRow, RosterStudent, RosterView};
use crate::error::AttendanceServiceError;

/// Project attendance records onto a roster. Pure and recomputable on
/// demand; no hidden state.
///
/// Enrolled students without a record render as absent. Records for users
/// not on the roster are ignored; the projection renders the roster, it is
/// not a source of truth.
pub fn project_roster(roster: &[RosterStudent], records: &[AttendanceRecord]) -> RosterView {
    let by_user: HashMap<Uuid, &AttendanceRecord> =
        records.iter().map(|r| (r.user_id, r)).collect();

    let mut rows = Vec::with_capacity(roster.len());
    let mut counts = RosterCounts::default();
    for student in roster {
        let (method, checked_in_at, status) = match by_user.get(&student.user_id) {
            Some(record) => (record.method, record.checked_in_at, record.status),
            None => (None, None, AttendanceStatus::Absent),
        };
        match status {
            AttendanceStatus::Verified => counts.verified += 1,
            AttendanceStatus::Pending => counts.pending += 1,
            AttendanceStatus::Absent => counts.absent += 1,
        }
        rows.push(RosterRow {
            student_id: student.user_id,
            name: student.name.clone(),
            method,
            checked_in_at,
            status,
        });
    }

    RosterView { rows, counts }
}

pub struct GetRosterUseCase<S, E, R>
where
    S: SessionRepository,
    E: EnrollmentRepository,
    R: AttendanceRecordRepository,
{
    pub sessions: S,
    pub enrollments: E,
    pub records: R,
}

impl<S, E, R> GetRosterUseCase<S, E, R>
where
    S: SessionRepository,
    E: EnrollmentRepository,
    R: AttendanceRecordRepository,
{
    pub async fn execute(&self, session_id: Uuid) -> Result<RosterView, AttendanceServiceError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;
        let roster = self.enrollments.list_students(session.course_id).await?;
        let records = self.records.list_by_session(session_id).await?;
        Ok(project_roster(&roster, &records))
    }
}

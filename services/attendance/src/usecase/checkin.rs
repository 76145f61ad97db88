//! Check-in intake: turn a submitted attempt into an attendance record.

use chrono::Utc;
use uuid::Uuid;

use rollcall_auth_types::pass::decode_pass;
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};

use crate::domain::repository::{
    AccountRepository, AttendanceRecordRepository, SessionRepository,
};
use crate::domain::types::AttendanceRecord;
use crate::error::AttendanceServiceError;

pub struct SubmitCheckInInput {
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub method: CheckInMethod,
    /// Encoded pass; required for `Code`, ignored otherwise.
    pub pass_payload: Option<String>,
    /// Instructor applying a `Manual` override; stamped as reviewer.
    pub reviewer_id: Option<Uuid>,
}

pub struct SubmitCheckInUseCase<S, A, R>
where
    S: SessionRepository,
    A: AccountRepository,
    R: AttendanceRecordRepository,
{
    pub sessions: S,
    pub accounts: A,
    pub records: R,
}

impl<S, A, R> SubmitCheckInUseCase<S, A, R>
where
    S: SessionRepository,
    A: AccountRepository,
    R: AttendanceRecordRepository,
{
    /// Validation order is fixed: session, student, pass (shape, session
    /// match, expiry), then window. A pass is judged against its *own*
    /// `expires_at`, so an expired pass reports `PassExpired` even when a
    /// refresh has since opened a newer one, and a superseded-but-unexpired
    /// pass still gets through.
    pub async fn execute(
        &self,
        input: SubmitCheckInInput,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let session = self
            .sessions
            .find_by_id(input.session_id)
            .await?
            .ok_or(AttendanceServiceError::SessionNotFound)?;
        let student = self
            .accounts
            .find_by_id(input.student_id)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)?;

        let now = Utc::now();

        if input.method == CheckInMethod::Code {
            let payload = input
                .pass_payload
                .as_deref()
                .ok_or(AttendanceServiceError::MalformedPass)?;
            let pass =
                decode_pass(payload).map_err(|_| AttendanceServiceError::MalformedPass)?;
            if pass.session_id != session.id {
                return Err(AttendanceServiceError::PassMismatch);
            }
            if pass.is_expired(now) {
                return Err(AttendanceServiceError::PassExpired);
            }
        }
        if input.method == CheckInMethod::Manual && input.reviewer_id.is_none() {
            return Err(AttendanceServiceError::MissingData);
        }

        if !session.window_is_open(now) {
            return Err(AttendanceServiceError::WindowClosed);
        }

        let record = AttendanceRecord {
            session_id: session.id,
            user_id: student.id,
            method: Some(input.method),
            status: match input.method {
                // Proximity evidence and instructor overrides are final.
                CheckInMethod::Beacon | CheckInMethod::Manual => AttendanceStatus::Verified,
                // A scanned pass only proves the student saw the code.
                CheckInMethod::Code => AttendanceStatus::Pending,
            },
            checked_in_at: Some(now),
            reviewer_id: match input.method {
                CheckInMethod::Manual => input.reviewer_id,
                _ => None,
            },
            reviewed_at: match input.method {
                CheckInMethod::Manual => Some(now),
                _ => None,
            },
            updated_at: now,
        };

        // The upsert re-checks the window transactionally; a concurrent close
        // between the check above and the write surfaces here.
        let stored = self.records.upsert_in_window(&record, now).await?;
        if !stored {
            return Err(AttendanceServiceError::WindowClosed);
        }

        Ok(record)
    }
}

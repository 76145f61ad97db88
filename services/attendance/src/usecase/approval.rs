//! The approval engine applied to requests and to scanned check-ins.
//!
//! The pure transition lives in `rollcall_domain::approval::decide`; these
//! usecases wrap it with the atomic persistence step (a conditional update
//! on pending) and, for requests, the entity-specific side effect that runs
//! once the winning transition is approved.

use chrono::Utc;
use uuid::Uuid;

use rollcall_domain::approval::{
    ApprovalKind, ApprovalOutcome, ApprovalStatus, decide,
};
use rollcall_domain::attendance::AttendanceStatus;

use crate::domain::repository::{
    AccountRepository, ApprovalRequestRepository, AttendanceRecordRepository, CourseRepository,
    EnrollmentRepository, MembershipRepository, SchoolRepository,
};
use crate::domain::types::{ApprovalRequest, AttendanceRecord};
use crate::error::AttendanceServiceError;

// ── Submit a request ─────────────────────────────────────────────────────────

pub struct SubmitRequestInput {
    pub kind: ApprovalKind,
    /// The requesting user. Handlers pass the caller's identity here.
    pub subject_id: Uuid,
    pub target_id: Uuid,
}

pub struct SubmitRequestUseCase<R, C, S, A, E, M>
where
    R: ApprovalRequestRepository,
    C: CourseRepository,
    S: SchoolRepository,
    A: AccountRepository,
    E: EnrollmentRepository,
    M: MembershipRepository,
{
    pub requests: R,
    pub courses: C,
    pub schools: S,
    pub accounts: A,
    pub enrollments: E,
    pub memberships: M,
}

impl<R, C, S, A, E, M> SubmitRequestUseCase<R, C, S, A, E, M>
where
    R: ApprovalRequestRepository,
    C: CourseRepository,
    S: SchoolRepository,
    A: AccountRepository,
    E: EnrollmentRepository,
    M: MembershipRepository,
{
    pub async fn execute(
        &self,
        input: SubmitRequestInput,
    ) -> Result<ApprovalRequest, AttendanceServiceError> {
        // 1. Target must exist and must not already be materialized.
        match input.kind {
            ApprovalKind::Enrollment => {
                self.courses
                    .find_by_id(input.target_id)
                    .await?
                    .ok_or(AttendanceServiceError::CourseNotFound)?;
                if self.enrollments.exists(input.target_id, input.subject_id).await? {
                    return Err(AttendanceServiceError::AlreadyEnrolled);
                }
            }
            ApprovalKind::Membership => {
                self.schools
                    .find_by_id(input.target_id)
                    .await?
                    .ok_or(AttendanceServiceError::SchoolNotFound)?;
                if self.memberships.exists(input.target_id, input.subject_id).await? {
                    return Err(AttendanceServiceError::AlreadyMember);
                }
            }
            ApprovalKind::Activation => {
                let account = self
                    .accounts
                    .find_by_id(input.target_id)
                    .await?
                    .ok_or(AttendanceServiceError::AccountNotFound)?;
                if account.active {
                    return Err(AttendanceServiceError::AlreadyActive);
                }
            }
        }

        // 2. One pending request per (kind, subject, target).
        if self
            .requests
            .has_pending(input.kind, input.subject_id, input.target_id)
            .await?
        {
            return Err(AttendanceServiceError::DuplicateRequest);
        }

        // 3. Record it.
        let request = ApprovalRequest {
            id: Uuid::new_v4(),
            kind: input.kind,
            subject_id: input.subject_id,
            target_id: input.target_id,
            status: ApprovalStatus::Pending,
            requested_at: Utc::now(),
            reviewer_id: None,
            reviewed_at: None,
            notes: None,
        };
        self.requests.create(&request).await?;
        Ok(request)
    }
}

// ── Decide a request ─────────────────────────────────────────────────────────

pub struct DecideRequestInput {
    pub request_id: Uuid,
    pub outcome: ApprovalOutcome,
    pub reviewer_id: Uuid,
    pub notes: Option<String>,
}

pub struct DecideRequestUseCase<R, E, M, A>
where
    R: ApprovalRequestRepository,
    E: EnrollmentRepository,
    M: MembershipRepository,
    A: AccountRepository,
{
    pub requests: R,
    pub enrollments: E,
    pub memberships: M,
    pub accounts: A,
}

impl<R, E, M, A> DecideRequestUseCase<R, E, M, A>
where
    R: ApprovalRequestRepository,
    E: EnrollmentRepository,
    M: MembershipRepository,
    A: AccountRepository,
{
    /// Apply a reviewer verdict. The status transition is a conditional
    /// update on pending, so racing reviewers get exactly one winner; the
    /// side effect runs only for the winner, and only on approval. The side
    /// effects are idempotent, so the materialized row is safe even when an
    /// identical request was approved through another path before.
    pub async fn execute(
        &self,
        input: DecideRequestInput,
    ) -> Result<ApprovalRequest, AttendanceServiceError> {
        let request = self
            .requests
            .find_by_id(input.request_id)
            .await?
            .ok_or(AttendanceServiceError::RequestNotFound)?;

        let decision = decide(request.status, input.outcome, input.reviewer_id, Utc::now())
            .map_err(|_| AttendanceServiceError::AlreadyDecided)?;

        let decided = ApprovalRequest {
            status: decision.status,
            reviewer_id: Some(decision.reviewer_id),
            reviewed_at: Some(decision.reviewed_at),
            notes: input.notes.or(request.notes.clone()),
            ..request
        };

        let won = self.requests.decide_if_pending(&decided).await?;
        if !won {
            return Err(AttendanceServiceError::AlreadyDecided);
        }

        if decided.status == ApprovalStatus::Approved {
            match decided.kind {
                ApprovalKind::Enrollment => {
                    self.enrollments.add(decided.target_id, decided.subject_id).await?;
                }
                ApprovalKind::Membership => {
                    self.memberships.add(decided.target_id, decided.subject_id).await?;
                }
                ApprovalKind::Activation => {
                    self.accounts.activate(decided.target_id).await?;
                }
            }
        }

        Ok(decided)
    }
}

// ── Decide a scanned check-in ────────────────────────────────────────────────

pub struct DecideCheckInInput {
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub outcome: ApprovalOutcome,
    pub reviewer_id: Uuid,
}

pub struct DecideCheckInUseCase<R>
where
    R: AttendanceRecordRepository,
{
    pub records: R,
}

impl<R> DecideCheckInUseCase<R>
where
    R: AttendanceRecordRepository,
{
    /// The engine applied to scanned check-ins. Approval verifies the record
    /// as it stands; rejection voids it, marking the student absent with
    /// method and check-in time cleared.
    pub async fn execute(
        &self,
        input: DecideCheckInInput,
    ) -> Result<AttendanceRecord, AttendanceServiceError> {
        let record = self
            .records
            .find(input.session_id, input.student_id)
            .await?
            .ok_or(AttendanceServiceError::RecordNotFound)?;

        if record.status != AttendanceStatus::Pending {
            return Err(AttendanceServiceError::AlreadyDecided);
        }

        let now = Utc::now();
        let decided = match input.outcome {
            ApprovalOutcome::Approved => AttendanceRecord {
                status: AttendanceStatus::Verified,
                reviewer_id: Some(input.reviewer_id),
                reviewed_at: Some(now),
                updated_at: now,
                ..record
            },
            ApprovalOutcome::Rejected => AttendanceRecord {
                status: AttendanceStatus::Absent,
                method: None,
                checked_in_at: None,
                reviewer_id: Some(input.reviewer_id),
                reviewed_at: Some(now),
                updated_at: now,
                ..record
            },
        };

        let won = self.records.decide_if_pending(&decided).await?;
        if !won {
            return Err(AttendanceServiceError::AlreadyDecided);
        }

        Ok(decided)
    }
}

// ── List requests ────────────────────────────────────────────────────────────

pub struct ListRequestsUseCase<R>
where
    R: ApprovalRequestRepository,
{
    pub requests: R,
}

impl<R> ListRequestsUseCase<R>
where
    R: ApprovalRequestRepository,
{
    pub async fn execute(
        &self,
        kind: Option<ApprovalKind>,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRequest>, AttendanceServiceError> {
        self.requests.list(kind, status).await
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::approval::{ApprovalKind, ApprovalOutcome, ApprovalStatus};
use rollcall_domain::role::UserRole;

use crate::domain::repository::ApprovalRequestRepository;
use crate::domain::types::ApprovalRequest;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::approval::{
    DecideRequestInput, DecideRequestUseCase, ListRequestsUseCase, SubmitRequestInput,
    SubmitRequestUseCase,
};

#[derive(Serialize)]
pub struct ApprovalResponse {
    pub id: String,
    pub kind: ApprovalKind,
    pub subject_id: String,
    pub target_id: String,
    pub status: ApprovalStatus,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub requested_at: chrono::DateTime<chrono::Utc>,
    pub reviewer_id: Option<String>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms_opt")]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
}

fn approval_response(request: ApprovalRequest) -> ApprovalResponse {
    ApprovalResponse {
        id: request.id.to_string(),
        kind: request.kind,
        subject_id: request.subject_id.to_string(),
        target_id: request.target_id.to_string(),
        status: request.status,
        requested_at: request.requested_at,
        reviewer_id: request.reviewer_id.map(|id| id.to_string()),
        reviewed_at: request.reviewed_at,
        notes: request.notes,
    }
}

/// Enrollment verdicts are an instructor matter; membership and activation
/// change who belongs to the institution, so those stay with admins.
fn reviewer_floor(kind: ApprovalKind) -> UserRole {
    match kind {
        ApprovalKind::Enrollment => UserRole::Instructor,
        ApprovalKind::Membership | ApprovalKind::Activation => UserRole::Admin,
    }
}

// ── POST /approvals ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitApprovalRequest {
    pub kind: ApprovalKind,
    pub target_id: Uuid,
}

pub async fn submit_approval(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Json(body): Json<SubmitApprovalRequest>,
) -> Result<(StatusCode, Json<ApprovalResponse>), AttendanceServiceError> {
    let usecase = SubmitRequestUseCase {
        requests: state.approval_request_repo(),
        courses: state.course_repo(),
        schools: state.school_repo(),
        accounts: state.account_repo(),
        enrollments: state.enrollment_repo(),
        memberships: state.membership_repo(),
    };
    let request = usecase
        .execute(SubmitRequestInput {
            kind: body.kind,
            subject_id: identity.user_id,
            target_id: body.target_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(approval_response(request))))
}

// ── GET /approvals ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListApprovalsQuery {
    pub kind: Option<String>,
    pub status: Option<String>,
}

pub async fn list_approvals(
    identity: CallerIdentity,
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ListApprovalsQuery>,
) -> Result<Json<Vec<ApprovalResponse>>, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    // Unknown filter values just drop the filter.
    let kind = query
        .kind
        .as_deref()
        .and_then(ApprovalKind::from_snake_case);
    let status = query
        .status
        .as_deref()
        .and_then(ApprovalStatus::from_snake_case);

    let usecase = ListRequestsUseCase {
        requests: state.approval_request_repo(),
    };
    let requests = usecase.execute(kind, status).await?;
    Ok(Json(requests.into_iter().map(approval_response).collect()))
}

// ── PATCH /approvals/{request_id} ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DecideApprovalRequest {
    pub outcome: ApprovalOutcome,
    pub notes: Option<String>,
}

pub async fn decide_approval(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<DecideApprovalRequest>,
) -> Result<Json<ApprovalResponse>, AttendanceServiceError> {
    // The floor depends on the request's kind, so fetch it before deciding.
    let request = state
        .approval_request_repo()
        .find_by_id(request_id)
        .await?
        .ok_or(AttendanceServiceError::RequestNotFound)?;
    if identity.role < reviewer_floor(request.kind) {
        return Err(AttendanceServiceError::Forbidden);
    }

    let usecase = DecideRequestUseCase {
        requests: state.approval_request_repo(),
        enrollments: state.enrollment_repo(),
        memberships: state.membership_repo(),
        accounts: state.account_repo(),
    };
    let decided = usecase
        .execute(DecideRequestInput {
            request_id,
            outcome: body.outcome,
            reviewer_id: identity.user_id,
            notes: body.notes,
        })
        .await?;
    Ok(Json(approval_response(decided)))
}

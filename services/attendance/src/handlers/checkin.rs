use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::approval::ApprovalOutcome;
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};
use rollcall_domain::role::UserRole;

use crate::domain::types::AttendanceRecord;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::approval::{DecideCheckInInput, DecideCheckInUseCase};
use crate::usecase::checkin::{SubmitCheckInInput, SubmitCheckInUseCase};

#[derive(Serialize)]
pub struct RecordResponse {
    pub session_id: String,
    pub student_id: String,
    pub method: Option<CheckInMethod>,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms_opt")]
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reviewer_id: Option<String>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms_opt")]
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn record_response(record: AttendanceRecord) -> RecordResponse {
    RecordResponse {
        session_id: record.session_id.to_string(),
        student_id: record.user_id.to_string(),
        method: record.method,
        status: record.status,
        checked_in_at: record.checked_in_at,
        reviewer_id: record.reviewer_id.map(|id| id.to_string()),
        reviewed_at: record.reviewed_at,
    }
}

// ── POST /sessions/{session_id}/check-ins ────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitCheckInRequest {
    pub method: CheckInMethod,
    /// Defaults to the caller. Only instructors may check in someone else.
    pub student_id: Option<Uuid>,
    pub pass_payload: Option<String>,
}

pub async fn submit_check_in(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SubmitCheckInRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AttendanceServiceError> {
    let student_id = body.student_id.unwrap_or(identity.user_id);
    // Students submit only code scans for themselves; beacon and manual
    // come from instructor-operated hardware or the dashboard.
    if identity.role < UserRole::Instructor
        && (body.method != CheckInMethod::Code || student_id != identity.user_id)
    {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = SubmitCheckInUseCase {
        sessions: state.session_repo(),
        accounts: state.account_repo(),
        records: state.record_repo(),
    };
    let record = usecase
        .execute(SubmitCheckInInput {
            session_id,
            student_id,
            method: body.method,
            pass_payload: body.pass_payload,
            reviewer_id: (body.method == CheckInMethod::Manual).then_some(identity.user_id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record_response(record))))
}

// ── PATCH /sessions/{session_id}/check-ins/{student_id} ──────────────────────

#[derive(Deserialize)]
pub struct DecideCheckInRequest {
    pub outcome: ApprovalOutcome,
}

pub async fn decide_check_in(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path((session_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<DecideCheckInRequest>,
) -> Result<Json<RecordResponse>, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = DecideCheckInUseCase {
        records: state.record_repo(),
    };
    let record = usecase
        .execute(DecideCheckInInput {
            session_id,
            student_id,
            outcome: body.outcome,
            reviewer_id: identity.user_id,
        })
        .await?;
    Ok(Json(record_response(record)))
}

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};
use rollcall_domain::role::UserRole;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::roster::GetRosterUseCase;

// ── GET /sessions/{session_id}/roster ────────────────────────────────────────

#[derive(Serialize)]
pub struct RosterRowResponse {
    pub student_id: String,
    pub name: String,
    pub method: Option<CheckInMethod>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms_opt")]
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: AttendanceStatus,
}

#[derive(Serialize)]
pub struct RosterCountsResponse {
    pub verified: usize,
    pub pending: usize,
    pub absent: usize,
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub rows: Vec<RosterRowResponse>,
    pub counts: RosterCountsResponse,
}

pub async fn get_roster(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = GetRosterUseCase {
        sessions: state.session_repo(),
        enrollments: state.enrollment_repo(),
        records: state.record_repo(),
    };
    let view = usecase.execute(session_id).await?;
    Ok(Json(RosterResponse {
        rows: view
            .rows
            .into_iter()
            .map(|row| RosterRowResponse {
                student_id: row.student_id.to_string(),
                name: row.name,
                method: row.method,
                checked_in_at: row.checked_in_at,
                status: row.status,
            })
            .collect(),
        counts: RosterCountsResponse {
            verified: view.counts.verified,
            pending: view.counts.pending,
            absent: view.counts.absent,
        },
    }))
}

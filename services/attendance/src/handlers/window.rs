use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::role::UserRole;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::window::{
    CloseWindowInput, CloseWindowUseCase, OpenWindowInput, OpenWindowUseCase, RefreshWindowInput,
    RefreshWindowUseCase, WindowGrant,
};

#[derive(Serialize)]
pub struct WindowGrantResponse {
    /// Opaque pass for the projected code. Clients render it as-is.
    pub pass_payload: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

fn grant_response(grant: WindowGrant) -> WindowGrantResponse {
    WindowGrantResponse {
        pass_payload: grant.pass_payload,
        expires_at: grant.expires_at,
    }
}

// ── POST /sessions/{session_id}/window ───────────────────────────────────────

#[derive(Deserialize)]
pub struct OpenWindowRequest {
    pub window_secs: Option<i64>,
}

pub async fn open_window(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<OpenWindowRequest>,
) -> Result<(StatusCode, Json<WindowGrantResponse>), AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = OpenWindowUseCase {
        sessions: state.session_repo(),
        courses: state.course_repo(),
    };
    let grant = usecase
        .execute(OpenWindowInput {
            session_id,
            window_secs: body.window_secs,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(grant_response(grant))))
}

// ── PATCH /sessions/{session_id}/window ──────────────────────────────────────

pub async fn refresh_window(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<WindowGrantResponse>, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = RefreshWindowUseCase {
        sessions: state.session_repo(),
        courses: state.course_repo(),
    };
    let grant = usecase.execute(RefreshWindowInput { session_id }).await?;
    Ok(Json(grant_response(grant)))
}

// ── DELETE /sessions/{session_id}/window ─────────────────────────────────────

pub async fn close_window(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = CloseWindowUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(CloseWindowInput { session_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

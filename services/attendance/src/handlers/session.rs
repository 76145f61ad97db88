use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::role::UserRole;

use crate::domain::types::Session;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::session::{CreateSessionInput, CreateSessionUseCase, ListSessionsUseCase};

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub location: Option<String>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub starts_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub window_open: bool,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms_opt")]
    pub window_expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        id: session.id.to_string(),
        course_id: session.course_id.to_string(),
        title: session.title,
        location: session.location,
        starts_at: session.starts_at,
        ends_at: session.ends_at,
        window_open: session.window_open,
        window_expires_at: session.window_expires_at,
    }
}

// ── POST /courses/{course_id}/sessions ───────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub location: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_session(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = CreateSessionUseCase {
        courses: state.course_repo(),
        sessions: state.session_repo(),
    };
    let session = usecase
        .execute(CreateSessionInput {
            course_id,
            title: body.title,
            location: body.location,
            starts_at: body.starts_at,
            ends_at: body.ends_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session_response(session))))
}

// ── GET /courses/{course_id}/sessions ────────────────────────────────────────

pub async fn list_sessions(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<SessionResponse>>, AttendanceServiceError> {
    if identity.role < UserRole::Instructor {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = ListSessionsUseCase {
        courses: state.course_repo(),
        sessions: state.session_repo(),
    };
    let sessions = usecase.execute(course_id).await?;
    Ok(Json(sessions.into_iter().map(session_response).collect()))
}

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::CallerIdentity;
use rollcall_domain::role::UserRole;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::catalog::{
    CreateCourseInput, CreateCourseUseCase, CreateSchoolInput, CreateSchoolUseCase,
};

// ── POST /schools ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSchoolRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct SchoolResponse {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_school(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateSchoolRequest>,
) -> Result<(StatusCode, Json<SchoolResponse>), AttendanceServiceError> {
    if identity.role < UserRole::Admin {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = CreateSchoolUseCase {
        schools: state.school_repo(),
    };
    let school = usecase.execute(CreateSchoolInput { name: body.name }).await?;
    Ok((
        StatusCode::CREATED,
        Json(SchoolResponse {
            id: school.id.to_string(),
            name: school.name,
            created_at: school.created_at,
        }),
    ))
}

// ── POST /courses ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCourseRequest {
    pub school_id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub school_id: String,
    pub code: String,
    pub name: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_course(
    identity: CallerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AttendanceServiceError> {
    if identity.role < UserRole::Admin {
        return Err(AttendanceServiceError::Forbidden);
    }
    let usecase = CreateCourseUseCase {
        schools: state.school_repo(),
        courses: state.course_repo(),
    };
    let course = usecase
        .execute(CreateCourseInput {
            school_id: body.school_id,
            code: body.code,
            name: body.name,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            id: course.id.to_string(),
            school_id: course.school_id.to_string(),
            code: course.code,
            name: course.name,
            created_at: course.created_at,
        }),
    ))
}

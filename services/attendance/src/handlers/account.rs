use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::account::{RegisterAccountInput, RegisterAccountUseCase};

// ── POST /accounts ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterAccountRequest {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub active: bool,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Self-registration. The only unauthenticated route: the account lands
/// inactive, together with a pending activation request for an admin.
pub async fn register_account(
    State(state): State<AppState>,
    Json(body): Json<RegisterAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AttendanceServiceError> {
    let usecase = RegisterAccountUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase
        .execute(RegisterAccountInput {
            name: body.name,
            email: body.email,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            id: account.id.to_string(),
            name: account.name,
            email: account.email,
            active: account.active,
            created_at: account.created_at,
        }),
    ))
}

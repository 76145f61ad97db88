use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;

use rollcall_core::health::healthz;
use rollcall_core::middleware::{request_id_layer, trace_layer};

use crate::handlers::{
    account::register_account,
    approval::{decide_approval, list_approvals, submit_approval},
    catalog::{create_course, create_school},
    checkin::{decide_check_in, submit_check_in},
    roster::get_roster,
    session::{create_session, list_sessions},
    window::{close_window, open_window, refresh_window},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/accounts", post(register_account))
        // Catalog
        .route("/schools", post(create_school))
        .route("/courses", post(create_course))
        // Sessions
        .route("/courses/{course_id}/sessions", post(create_session))
        .route("/courses/{course_id}/sessions", get(list_sessions))
        // Check-in window
        .route("/sessions/{session_id}/window", post(open_window))
        .route("/sessions/{session_id}/window", patch(refresh_window))
        .route("/sessions/{session_id}/window", delete(close_window))
        // Check-ins
        .route("/sessions/{session_id}/check-ins", post(submit_check_in))
        .route(
            "/sessions/{session_id}/check-ins/{student_id}",
            patch(decide_check_in),
        )
        // Roster
        .route("/sessions/{session_id}/roster", get(get_roster))
        // Approvals
        .route("/approvals", post(submit_approval))
        .route("/approvals", get(list_approvals))
        .route("/approvals/{request_id}", patch(decide_approval))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer()),
        )
        .with_state(state)
}

/// Readiness means "able to serve", which for this service means the
/// database answers. Kubernetes stops routing to the pod on 503.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

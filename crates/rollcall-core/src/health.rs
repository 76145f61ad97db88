use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness only. Always 200 while the
/// process is up. Readiness is service-specific (it usually needs a
/// database ping), so each service mounts its own `/readyz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

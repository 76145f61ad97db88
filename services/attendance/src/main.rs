use sea_orm::Database;
use tracing::info;

use rollcall_attendance::config::AttendanceConfig;
use rollcall_attendance::infra::sweeper::run_window_sweeper;
use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;

#[tokio::main]
async fn main() {
    rollcall_core::tracing::init_tracing();

    let config = AttendanceConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    // Closes windows whose expiry has lapsed without an explicit close.
    tokio::spawn(run_window_sweeper(
        state.session_repo(),
        config.sweep_interval_secs,
    ));

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("attendance service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}

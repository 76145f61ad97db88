use std::time::Duration;

use tracing::{error, info};

use crate::domain::repository::SessionRepository;

/// Background task closing check-in windows whose expiry lapsed without a
/// refresh. This is the automatic half of the window state machine; manual
/// close and refresh go through the usecases. A refresh that advanced the
/// expiry in the meantime falls outside the sweep's conditional update and
/// is left alone.
pub async fn run_window_sweeper<S>(sessions: S, interval_secs: u64)
where
    S: SessionRepository,
{
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        interval.tick().await;
        match sessions.close_expired(chrono::Utc::now()).await {
            Ok(0) => {}
            Ok(closed) => info!(closed, "closed expired check-in windows"),
            Err(e) => error!(error = %e, "window sweep failed"),
        }
    }
}

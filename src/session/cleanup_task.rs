use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::repository::SessionStore;
use crate::shared::AppError;

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to purge idle-expired sessions
    pub cleanup_interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(10 * 60),
        }
    }
}

/// Starts the background task that periodically removes expired sessions
#[instrument(skip(session_store))]
pub async fn start_cleanup_task(
    session_store: Arc<dyn SessionStore + Send + Sync>,
    config: CleanupConfig,
) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        "Starting session cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;

        match cleanup_expired_sessions(&session_store).await {
            Ok(removed) => {
                info!(removed_sessions = removed, "Session cleanup completed");
            }
            Err(e) => {
                error!(error = %e, "Session cleanup task failed");
            }
        }
    }
}

pub async fn cleanup_expired_sessions(
    session_store: &Arc<dyn SessionStore + Send + Sync>,
) -> Result<u64, AppError> {
    session_store.cleanup_expired().await
}

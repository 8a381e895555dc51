use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::db::Db;
use crate::services::league as service;

/// Periodically commits every league whose week has ended.
pub async fn run_commit_loop(db: Arc<Db>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        let now = Utc::now().timestamp_millis();
        match service::commit_due_leagues(&db, now) {
            Ok(committed) if !committed.is_empty() => {
                tracing::info!(count = committed.len(), "scheduled commits applied");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "scheduled commit check failed"),
        }
    }
}

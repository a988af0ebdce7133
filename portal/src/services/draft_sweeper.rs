use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::repository;
use crate::error::AppError;

/// Periodically deletes registration drafts nobody touched for `ttl`.
pub struct DraftSweeper {
    db: SqlitePool,
    ttl: Duration,
    interval: Duration,
}

impl DraftSweeper {
    pub fn new(db: SqlitePool, ttl_secs: u64, interval_secs: u64) -> Self {
        Self {
            db,
            ttl: Duration::from_secs(ttl_secs),
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Runs forever; a failed sweep is logged and retried next tick.
    pub async fn start(self) {
        info!(
            "Starting draft sweeper (interval: {:?}, ttl: {:?})",
            self.interval, self.ttl
        );

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_once().await {
                Ok(0) => debug!("Draft sweep found nothing to delete"),
                Ok(removed) => info!("Draft sweep removed {} stale drafts", removed),
                Err(e) => warn!("Draft sweep failed: {:?}", e),
            }
        }
    }

    pub async fn run_once(&self) -> Result<u64, AppError> {
        let cutoff = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
            .ok_or_else(|| {
                AppError::BadRequest(format!("draft ttl out of range: {:?}", self.ttl))
            })?;
        repository::delete_drafts_older_than(&self.db, cutoff).await
    }
}

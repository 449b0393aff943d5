//! Cron jobs
//!
//! The weekly ticket distribution runs on `WEEKLY_DISTRIBUTION_CRON` (daily
//! by default). Each run is idempotent per ISO week, so extra runs only skip.

use std::sync::Arc;

use chrono::Utc;
use hub_common::AppError;
use hub_service::WalletService;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::state::AppState;

/// Build and start the scheduler; keep the handle alive for the jobs to run
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| AppError::Config(format!("Failed to create scheduler: {e}")))?;

    let cron = state.config().wallet.weekly_distribution_cron.clone();
    scheduler
        .add(weekly_distribution_job(&cron, state)?)
        .await
        .map_err(|e| AppError::Config(format!("Failed to schedule weekly distribution: {e}")))?;

    scheduler
        .start()
        .await
        .map_err(|e| AppError::Config(format!("Failed to start scheduler: {e}")))?;

    info!(cron = %cron, "Weekly distribution scheduled");
    Ok(scheduler)
}

fn weekly_distribution_job(cron: &str, state: AppState) -> Result<Job, AppError> {
    // a slow run must not overlap the next tick
    let running = Arc::new(Mutex::new(()));

    Job::new_async(cron, move |_id, _scheduler| {
        let state = state.clone();
        let running = Arc::clone(&running);
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                warn!("Weekly distribution still running, skipping this tick");
                return;
            };
            run_weekly_distribution(&state).await;
        })
    })
    .map_err(|e| AppError::Config(format!("Invalid WEEKLY_DISTRIBUTION_CRON '{cron}': {e}")))
}

async fn run_weekly_distribution(state: &AppState) {
    match WalletService::new(state.service_context())
        .distribute_weekly(Utc::now())
        .await
    {
        Ok(report) => info!(
            reference = %report.reference,
            granted = report.granted,
            skipped = report.skipped,
            failed = report.failed,
            "Weekly distribution finished"
        ),
        Err(e) => error!(error = %e, "Weekly distribution aborted"),
    }
}

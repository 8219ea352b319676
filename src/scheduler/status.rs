use std::{sync::Arc, time::Duration};

use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::status::StatusPoller};

/// Starts the status scheduler
///
/// Polls once immediately so the status message appears at startup, then every
/// `interval`. Failed ticks are logged and leave the previous message in place.
///
/// # Arguments
/// - `poller`: Status poller owning the message handle
/// - `interval`: Time between polls
///
/// # Returns
/// - `Ok(JobScheduler)`: Running scheduler, kept alive by the caller
/// - `Err(AppError::SchedulerErr)`: Job could not be scheduled
pub async fn start_scheduler(
    poller: Arc<StatusPoller>,
    interval: Duration,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_poller = poller.clone();
    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let poller = job_poller.clone();

        Box::pin(async move {
            run_tick(&poller).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Status scheduler started, polling every {:?}", interval);

    run_tick(&poller).await;

    Ok(scheduler)
}

async fn run_tick(poller: &StatusPoller) {
    if let Err(e) = poller.poll().await {
        tracing::error!("Error updating server status: {}", e);
    }
}

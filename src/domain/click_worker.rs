//! Background worker applying queued click increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Base delay of the exponential backoff, in milliseconds.
const BACKOFF_BASE_MS: u64 = 10;

/// Upper bound for a single backoff delay.
const BACKOFF_MAX_DELAY: Duration = Duration::from_secs(1);

/// Consumes click events and increments the matching counters.
///
/// At most `concurrency` increments run at once. A failed increment is
/// retried with jittered exponential backoff, capped at
/// [`BACKOFF_MAX_DELAY`], until it is applied; only an unknown link id
/// drops the event. The worker returns once every sender has been dropped,
/// the queue is drained and all in-flight increments have been applied, so
/// shutdown waits out a storage outage.
pub async fn run_click_worker<L: LinkRepository>(
    mut rx: mpsc::Receiver<ClickEvent>,
    link_repository: Arc<L>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = link_repository.clone();
        in_flight.spawn(async move {
            apply_click(repository.as_ref(), &event).await;
            drop(permit);
        });

        // Reap finished tasks so the set does not grow with the queue.
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn apply_click<L: LinkRepository + ?Sized>(repository: &L, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
        .max_delay(BACKOFF_MAX_DELAY)
        .map(jitter);

    let mut attempt = 0usize;
    let result = RetryIf::spawn(
        strategy,
        || {
            attempt += 1;
            let attempt = attempt;
            async move {
                repository
                    .increment_clicks(event.link_id)
                    .await
                    .map(|()| attempt)
                    .inspect_err(|e| {
                        if !e.is_not_found() {
                            warn!(code = %event.code, attempt, error = %e, "Click increment failed, retrying");
                        }
                    })
            }
        },
        |e: &AppError| !e.is_not_found(),
    )
    .await;

    // The strategy never runs out, so only an unknown link id gets here.
    match result {
        Ok(1) => debug!(code = %event.code, "Click recorded"),
        Ok(attempts) => info!(
            code = %event.code,
            attempts,
            delay_ms = event.age().num_milliseconds(),
            "Click recorded after retries"
        ),
        Err(e) => warn!(
            code = %event.code,
            link_id = event.link_id,
            error = %e,
            "Click for unknown link discarded"
        ),
    }
}

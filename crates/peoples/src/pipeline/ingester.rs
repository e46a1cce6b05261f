//! Ingestion loop.
//!
//! Per message: decode and validate, enrich the first name, create the
//! record, commit. Rejected and failed messages get exactly one failure
//! record and are committed anyway; nothing is retried. The commit is
//! always the last action taken for a message.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use peoples_core::enrichment::Enricher;
use peoples_core::ingest::{
    decode_request, Delivery, EnrichmentFailure, FailureSink, MessageConsumer, ShutdownError,
    ValidatedRequest,
};
use peoples_core::storage::PersonRepository;

/// Collaborators shared by the poll loop and every message task.
struct MessageContext {
    consumer: Arc<dyn MessageConsumer>,
    failures: Arc<dyn FailureSink>,
    enricher: Arc<dyn Enricher>,
    repository: Arc<dyn PersonRepository>,
}

impl MessageContext {
    /// Reports a message rejected before enrichment, then commits it.
    async fn reject(&self, delivery: &Delivery, failure: EnrichmentFailure) {
        tracing::warn!(
            offset = delivery.offset,
            partition = delivery.partition,
            reason = %failure.error,
            "{}", failure.message
        );
        self.report(delivery, &failure).await;
        self.commit(delivery).await;
    }

    async fn process(&self, delivery: Delivery, request: ValidatedRequest) {
        let outcome = match self.enricher.enrich(request.inference_name()).await {
            Err(err) => {
                tracing::warn!(offset = delivery.offset, error = %err, "Enrichment failed");
                Err(EnrichmentFailure::enrichment_failed(err))
            }
            Ok(demographics) => {
                let person = request.into_new_person(demographics);
                match self.repository.create_person(&person).await {
                    Ok(id) => {
                        tracing::info!(offset = delivery.offset, person_id = %id, "Person enriched and stored");
                        Ok(())
                    }
                    Err(err) => {
                        tracing::error!(offset = delivery.offset, error = %err, "Persistence failed");
                        Err(EnrichmentFailure::persistence_failed(err))
                    }
                }
            }
        };

        if let Err(failure) = outcome {
            self.report(&delivery, &failure).await;
        }
        self.commit(&delivery).await;
    }

    async fn report(&self, delivery: &Delivery, failure: &EnrichmentFailure) {
        if let Err(err) = self.failures.publish(failure).await {
            tracing::error!(offset = delivery.offset, error = %err, "Failed to publish failure record");
        }
    }

    async fn commit(&self, delivery: &Delivery) {
        if let Err(err) = self.consumer.commit(delivery).await {
            tracing::error!(offset = delivery.offset, error = %err, "Failed to commit offset");
        }
    }
}

/// Consumes enrichment requests until shut down.
///
/// Message tasks are unbounded unless [`Ingester::with_max_in_flight`] is
/// set, in which case polling pauses while the limit is reached.
pub struct Ingester {
    context: Arc<MessageContext>,
    poll_timeout: Duration,
    max_in_flight: Option<usize>,
}

impl Ingester {
    pub fn new(
        consumer: Arc<dyn MessageConsumer>,
        failures: Arc<dyn FailureSink>,
        enricher: Arc<dyn Enricher>,
        repository: Arc<dyn PersonRepository>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            context: Arc::new(MessageContext {
                consumer,
                failures,
                enricher,
                repository,
            }),
            poll_timeout,
            max_in_flight: None,
        }
    }

    /// Caps the number of messages processed concurrently. Zero is treated
    /// as one.
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit.max(1));
        self
    }

    /// Spawns the poll loop and returns a handle to stop it.
    pub fn start(self) -> IngesterHandle {
        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = oneshot::channel();

        let token = cancel.clone();
        tokio::spawn(async move {
            self.run(token).await;
            let _ = done_tx.send(());
        });

        IngesterHandle {
            cancel,
            done: done_rx,
        }
    }

    async fn run(self, cancel: CancellationToken) {
        let tracker = TaskTracker::new();
        let limiter = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

        tracing::info!(max_in_flight = ?self.max_in_flight, "Ingestion started");

        loop {
            let permit = match &limiter {
                Some(semaphore) => match acquire(semaphore, &cancel).await {
                    Some(permit) => Some(permit),
                    None => break,
                },
                None => None,
            };

            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                polled = self.context.consumer.poll(self.poll_timeout) => polled,
            };

            let delivery = match polled {
                Ok(Some(delivery)) => delivery,
                Ok(None) => continue,
                Err(err) => {
                    tracing::error!(error = %err, retry_in = ?self.poll_timeout, "Poll failed");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_timeout) => continue,
                    }
                }
            };

            match decode_request(delivery.payload.as_deref()) {
                Err(failure) => self.context.reject(&delivery, failure).await,
                Ok(request) => {
                    let context = Arc::clone(&self.context);
                    tracker.spawn(async move {
                        context.process(delivery, request).await;
                        drop(permit);
                    });
                }
            }
        }

        tracker.close();
        tracing::info!(in_flight = tracker.len(), "Ingestion stopping, draining in-flight messages");
        tracker.wait().await;
        tracing::info!("Ingestion drained");
    }
}

/// Waits for a processing slot. `None` means shutdown was requested first.
async fn acquire(
    semaphore: &Arc<Semaphore>,
    cancel: &CancellationToken,
) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = Arc::clone(semaphore).acquire_owned() => permit.ok(),
    }
}

/// Handle to a running [`Ingester`].
pub struct IngesterHandle {
    cancel: CancellationToken,
    done: oneshot::Receiver<()>,
}

impl IngesterHandle {
    /// Stops polling and waits for in-flight messages to finish.
    ///
    /// If `deadline` elapses first, returns
    /// [`ShutdownError::DeadlineExceeded`]; the remaining tasks keep
    /// running until the runtime stops.
    pub async fn shutdown(self, deadline: Duration) -> Result<(), ShutdownError> {
        self.cancel.cancel();
        match tokio::time::timeout(deadline, self.done).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(ShutdownError::Aborted),
            Err(_) => Err(ShutdownError::DeadlineExceeded(deadline)),
        }
    }
}

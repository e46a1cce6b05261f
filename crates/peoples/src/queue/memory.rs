//! In-process queue used to drive the pipeline in tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use peoples_core::ingest::{
    Delivery, EnrichmentFailure, FailureSink, MessageConsumer, QueueError, Result,
};

pub const TOPIC: &str = "peoples";

/// Single-partition queue that records commits and published failures.
pub struct MemoryQueue {
    tx: mpsc::UnboundedSender<Delivery>,
    rx: Mutex<mpsc::UnboundedReceiver<Delivery>>,
    next_offset: AtomicI64,
    fail_next_poll: AtomicBool,
    commits: Mutex<Vec<i64>>,
    failures: Mutex<Vec<EnrichmentFailure>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            next_offset: AtomicI64::new(0),
            fail_next_poll: AtomicBool::new(false),
            commits: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Enqueues a payload and returns its offset.
    pub fn send(&self, payload: &[u8]) -> i64 {
        self.push(Some(payload.to_vec()))
    }

    /// Enqueues a message that carries no payload at all.
    pub fn send_empty(&self) -> i64 {
        self.push(None)
    }

    fn push(&self, payload: Option<Vec<u8>>) -> i64 {
        let offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        let delivery = Delivery {
            topic: TOPIC.to_string(),
            partition: 0,
            offset,
            payload,
        };
        // The receiver lives as long as `self`.
        let _ = self.tx.send(delivery);
        offset
    }

    pub fn fail_next_poll(&self) {
        self.fail_next_poll.store(true, Ordering::SeqCst);
    }

    /// Offsets committed so far, in commit order.
    pub async fn commits(&self) -> Vec<i64> {
        self.commits.lock().await.clone()
    }

    pub async fn failures(&self) -> Vec<EnrichmentFailure> {
        self.failures.lock().await.clone()
    }

    /// Waits until `count` commits were recorded, or panics after `within`.
    pub async fn wait_for_commits(&self, count: usize, within: Duration) {
        let deadline = tokio::time::Instant::now() + within;
        while self.commits.lock().await.len() < count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {count} commits"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl MessageConsumer for MemoryQueue {
    async fn poll(&self, timeout: Duration) -> Result<Option<Delivery>> {
        if self.fail_next_poll.swap(false, Ordering::SeqCst) {
            return Err(QueueError::PollFailed("broker transport failure".to_string()));
        }
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(delivery) => Ok(delivery),
            Err(_) => Ok(None),
        }
    }

    async fn commit(&self, delivery: &Delivery) -> Result<()> {
        self.commits.lock().await.push(delivery.offset);
        Ok(())
    }
}

#[async_trait]
impl FailureSink for MemoryQueue {
    async fn publish(&self, failure: &EnrichmentFailure) -> Result<()> {
        self.failures.lock().await.push(failure.clone());
        Ok(())
    }
}

//! Notifiers that record or refuse deliveries.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::OwnerId;
use crate::error::NotifyError;
use crate::port::outbound::notifier::{AlertMessage, Notifier};

/// Thread-safe delivery collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(OwnerId, AlertMessage)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sent(&self) -> Vec<(OwnerId, AlertMessage)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, owner: &OwnerId, message: &AlertMessage) -> Result<(), NotifyError> {
        self.sent.lock().push((owner.clone(), message.clone()));
        Ok(())
    }
}

/// A notifier whose every delivery fails, counting attempts.
#[derive(Clone, Default)]
pub struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, owner: &OwnerId, _message: &AlertMessage) -> Result<(), NotifyError> {
        *self.attempts.lock() += 1;
        Err(NotifyError::Delivery {
            owner: owner.clone(),
            reason: "recipient does not accept direct messages".into(),
        })
    }
}

//! Email dispatch seam
//!
//! The stub resolves after a fixed simulated latency and always reports
//! success. The trait contract still allows failure so a real transactional
//! provider can slot in behind it; callers must treat a dispatch error as
//! "invitation not sent".

use crate::EmailMessage;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Email dispatch errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}

/// Proof of a dispatched message
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// Provider-assigned message id
    pub message_id: Uuid,
    /// Recipient address the message went to
    pub recipient: String,
    /// When the provider accepted the message
    pub sent_at: DateTime<Utc>,
}

/// Trait for sending rendered emails
#[async_trait::async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Send one message to one recipient
    async fn send(
        &self,
        recipient: &str,
        message: &EmailMessage,
    ) -> Result<DispatchReceipt, EmailError>;
}

/// Simulated dispatcher (default implementation)
///
/// Sleeps for a fixed latency, then succeeds. Does not guarantee (or
/// attempt) real delivery.
#[derive(Debug, Clone)]
pub struct StubDispatcher {
    latency: Duration,
}

impl StubDispatcher {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(150),
        }
    }

    /// Override the simulated latency (tests use zero)
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for StubDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailDispatcher for StubDispatcher {
    async fn send(
        &self,
        recipient: &str,
        message: &EmailMessage,
    ) -> Result<DispatchReceipt, EmailError> {
        debug!(recipient = %recipient, subject = %message.subject, "Simulating email dispatch");
        tokio::time::sleep(self.latency).await;

        let receipt = DispatchReceipt {
            message_id: Uuid::new_v4(),
            recipient: recipient.to_string(),
            sent_at: Utc::now(),
        };
        info!(
            recipient = %recipient,
            message_id = %receipt.message_id,
            "Email dispatched (simulated)"
        );
        Ok(receipt)
    }
}

//! NATS subscription for incoming form submissions

use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for receiving form submissions from NATS
pub struct SubmissionConsumer {
    client: Client,
    subject: String,
    queue_group: Option<String>,
}

impl SubmissionConsumer {
    /// Create a new submission consumer
    pub fn new(client: Client, subject: &str, queue_group: Option<String>) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            queue_group,
        }
    }

    /// Subscribe to the submission subject, joining the queue group if one is set
    pub async fn subscribe(&self) -> Result<Subscriber> {
        self.subscribe_to(&self.subject).await
    }

    /// Subscribe to another subject with the same queue group
    pub async fn subscribe_to(&self, subject: &str) -> Result<Subscriber> {
        let subscriber = match &self.queue_group {
            Some(group) => {
                self.client
                    .queue_subscribe(subject.to_string(), group.clone())
                    .await?
            }
            None => self.client.subscribe(subject.to_string()).await?,
        };
        info!(subject = %subject, queue_group = ?self.queue_group, "Subscribed to subject");
        Ok(subscriber)
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

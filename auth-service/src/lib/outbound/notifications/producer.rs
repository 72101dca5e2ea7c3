use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::domain::user::notifications::VerificationRequested;
use crate::outbound::notifications::messages::NotificationMessage;
use crate::outbound::notifications::messages::VerificationEmailMessage;
use crate::user::errors::NotificationError;
use crate::user::ports::NotificationSender;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for NotificationError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                NotificationError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => NotificationError::PublishFailed(msg),
        }
    }
}

/// Hands notifications to the mail worker through a Kafka topic.
pub struct KafkaNotificationProducer {
    producer: FutureProducer,
    topic: String,
    verify_url: String,
    timeout: Duration,
}

impl KafkaNotificationProducer {
    /// Create a new Kafka notification producer with "at least once" delivery semantics
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    /// - `retry.backoff.ms=100`: Backoff between retry attempts
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.kafka.brokers,
            topic = %config.kafka.topic,
            "Initializing Kafka producer for notifications"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "10000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            topic: config.kafka.topic.to_string(),
            verify_url: config.notifications.verify_url.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Publish a message keyed by recipient so one mailbox keeps its ordering.
    async fn publish<T: Serialize>(&self, key: &str, message: &T) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(&self.topic).key(key).payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(topic = %self.topic, "Notification published");
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl NotificationSender for KafkaNotificationProducer {
    async fn send_verification(
        &self,
        notification: &VerificationRequested,
    ) -> Result<(), NotificationError> {
        let message = NotificationMessage::VerificationRequested(VerificationEmailMessage::new(
            notification,
            &self.verify_url,
        ));

        self.publish(&notification.email, &message)
            .await
            .map_err(NotificationError::from)
    }
}

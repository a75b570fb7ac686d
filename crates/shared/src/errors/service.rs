use rdkafka::error::KafkaError;
use thiserror::Error;

/// Infrastructure faults outside the email pipeline itself (consumer
/// plumbing, transport construction). Pipeline outcomes use
/// [`HandlerError`](crate::errors::HandlerError) instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl From<KafkaError> for ServiceError {
    fn from(error: KafkaError) -> Self {
        ServiceError::Kafka(error.to_string())
    }
}

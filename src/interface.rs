use crate::configs::KafkaProducerConfig;
use crate::error::SeedError;
use crate::message::OutgoingMessage;
use async_trait::async_trait;

#[async_trait]
pub trait BatchProducer: Send + Sync {
    fn from_config(kafka_config: KafkaProducerConfig) -> Result<Self, SeedError>
    where
        Self: Sized;

    /// Publishes every message of the batch to `topic` and resolves once the
    /// broker has acknowledged or rejected all of them.
    async fn send_batch(&self, topic: &str, messages: Vec<OutgoingMessage>) -> Result<(), SeedError>;
}

/// Accepts batches without contacting a broker.
pub struct DryRunProducer {}

#[async_trait]
impl BatchProducer for DryRunProducer {
    fn from_config(kafka_config: KafkaProducerConfig) -> Result<Self, SeedError> {
        info!("Dry run, {} will not be contacted", kafka_config.brokers);
        Ok(DryRunProducer {})
    }

    async fn send_batch(&self, topic: &str, messages: Vec<OutgoingMessage>) -> Result<(), SeedError> {
        info!("Dry run: skipped {} messages for {}", messages.len(), topic);
        Ok(())
    }
}

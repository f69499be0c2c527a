use crate::configs::KafkaProducerConfig;
use crate::error::Result;
use crate::error::SeedError;
use crate::interface::BatchProducer;
use crate::message::OutgoingMessage;
use futures::future::join_all;
use rdkafka::client::ClientContext;
use rdkafka::error::KafkaError;
use rdkafka::producer::future_producer::OwnedDeliveryResult;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::ClientConfig;
use std::time::Duration;

/// Logs connection level errors reported by librdkafka. They never stop the seeding,
/// a broken connection shows up again as failed deliveries.
pub struct SeedContext;

impl ClientContext for SeedContext {
    fn error(&self, error: KafkaError, reason: &str) {
        error!("Kafka client error: {}: {}", error, reason);
    }
}

pub struct RdkafkaProducer {
    producer:      FutureProducer<SeedContext>,
    queue_timeout: Duration,
}

impl RdkafkaProducer {
    /// Enqueues every message and waits for all deliveries. A full local queue makes a
    /// send wait for room, up to the message timeout, instead of failing right away.
    pub async fn deliver_all(&self, topic: &str, messages: &[OutgoingMessage]) -> Vec<OwnedDeliveryResult> {
        let deliveries = messages.iter().map(|msg| {
            let mut record = FutureRecord::to(topic).payload(&msg.payload);
            if let Some(key) = &msg.key {
                record = record.key(key);
            }
            self.producer.send(record, self.queue_timeout)
        });
        join_all(deliveries).await
    }
}

#[async_trait]
impl BatchProducer for RdkafkaProducer {
    fn from_config(kafka_config: KafkaProducerConfig) -> Result<Self>
    where
        Self: Sized,
    {
        info!("Connecting to {}", kafka_config.brokers);
        let producer = ClientConfig::new()
            .set("bootstrap.servers", &kafka_config.brokers)
            .set("socket.connection.setup.timeout.ms", kafka_config.connect_timeout.as_millis().to_string())
            .set("message.timeout.ms", kafka_config.message_timeout.as_millis().to_string())
            .set("queue.buffering.max.messages", kafka_config.queue_size.to_string())
            .create_with_context(SeedContext)?;
        Ok(RdkafkaProducer {
            producer,
            queue_timeout: kafka_config.message_timeout,
        })
    }

    async fn send_batch(&self, topic: &str, messages: Vec<OutgoingMessage>) -> Result<()> {
        let mut first_error = None;
        let mut failed = 0;
        for delivery in self.deliver_all(topic, &messages).await {
            match delivery {
                Ok((partition, offset)) => debug!("Delivered to {}[{}]@{}", topic, partition, offset),
                Err((err, _msg)) => {
                    failed += 1;
                    first_error.get_or_insert(err);
                },
            }
        }

        match first_error {
            None => Ok(()),
            Some(source) => {
                warn!("{} of {} messages for {} were not delivered", failed, messages.len(), topic);
                Err(SeedError::Publish {
                    topic: topic.to_owned(),
                    source,
                })
            },
        }
    }
}

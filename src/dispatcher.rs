use crate::configs::TopicAssignment;
use crate::error::Result;
use crate::gate::CompletionHandle;
use crate::interface::BatchProducer;
use crate::message::build_batch;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Builds the keyed batch for `records` and submits it in one `send_batch` call.
/// Returns the number of messages published.
pub async fn publish_records<P: BatchProducer + ?Sized>(producer: &P, topic: &str, key_field: &str, records: &[Value]) -> Result<usize> {
    let messages = build_batch(records, key_field)?;
    let keyless = messages.iter().filter(|m| m.key.is_none()).count();
    if keyless > 0 {
        warn!("{} records for {} have no {} field, publishing them without key", keyless, topic, key_field);
    }
    println!("{} {}", topic, serde_json::to_string(&messages)?);

    let count = messages.len();
    producer.send_batch(topic, messages).await?;
    Ok(count)
}

/// Publishes the records on a separate task and reports the outcome through `handle`
/// exactly once.
pub fn dispatch<P: BatchProducer + 'static>(producer: Arc<P>, assignment: &TopicAssignment, records: Vec<Value>, handle: CompletionHandle) -> JoinHandle<()> {
    let topic = assignment.topic.clone();
    let key_field = assignment.key_field.clone();
    tokio::spawn(async move {
        let result = publish_records(producer.as_ref(), &topic, &key_field, &records).await;
        handle.complete(topic, result);
    })
}

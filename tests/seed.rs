use async_trait::async_trait;
use kafseed::bootstrap::run_seed;
use kafseed::configs::KafkaProducerConfig;
use kafseed::configs::TopicAssignment;
use kafseed::error::SeedError;
use kafseed::fixture::load_fixtures;
use kafseed::interface::BatchProducer;
use kafseed::message::OutgoingMessage;
use rdkafka::error::KafkaError;
use rdkafka::error::RDKafkaErrorCode;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingProducer {
    batches:    Mutex<Vec<(String, Vec<OutgoingMessage>)>>,
    fail_topic: Option<String>,
}

#[async_trait]
impl BatchProducer for RecordingProducer {
    fn from_config(_kafka_config: KafkaProducerConfig) -> Result<Self, SeedError> { Ok(RecordingProducer::default()) }

    async fn send_batch(&self, topic: &str, messages: Vec<OutgoingMessage>) -> Result<(), SeedError> {
        self.batches.lock().unwrap().push((topic.to_owned(), messages));
        if self.fail_topic.as_deref() == Some(topic) {
            return Err(SeedError::Publish {
                topic:  topic.to_owned(),
                source: KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut),
            });
        }
        Ok(())
    }
}

fn write_fixtures(dir: &Path, customers: &str, products: &str, orders: &str) {
    fs::write(dir.join("customers.json"), customers).unwrap();
    fs::write(dir.join("products.json"), products).unwrap();
    fs::write(dir.join("orders.json"), orders).unwrap();
}

#[tokio::test]
async fn one_record_per_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let record = r#"[{"id": "A1", "name": "x"}]"#;
    write_fixtures(dir.path(), record, record, record);

    let loaded = load_fixtures(dir.path(), &TopicAssignment::defaults()).await.unwrap();
    let producer = Arc::new(RecordingProducer::default());
    let report = run_seed(Arc::clone(&producer), loaded).await;

    assert!(report.is_complete());
    assert_eq!(report.published(), 3);

    let mut batches = producer.batches.lock().unwrap().clone();
    batches.sort_by(|a, b| a.0.cmp(&b.0));
    let topics: Vec<_> = batches.iter().map(|(topic, _)| topic.as_str()).collect();
    assert_eq!(topics, vec!["customers", "orders", "products"]);
    for (_, messages) in batches {
        assert_eq!(
            messages,
            vec![OutgoingMessage {
                key:     Some("A1".to_owned()),
                payload: r#"{"id":"A1","name":"x"}"#.to_owned(),
            }]
        );
    }
}

#[tokio::test]
async fn message_count_and_keys_follow_records() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(
        dir.path(),
        r#"[{"id": "C1"}, {"id": "C2"}]"#,
        r#"[]"#,
        r#"[{"id": 1, "total": 9.5}, {"id": 2, "total": 3}, {"total": 0}]"#,
    );

    let loaded = load_fixtures(dir.path(), &TopicAssignment::defaults()).await.unwrap();
    let records: Vec<Vec<Value>> = loaded.iter().map(|(_, fixture)| fixture.records.clone()).collect();
    let producer = Arc::new(RecordingProducer::default());
    let report = run_seed(Arc::clone(&producer), loaded).await;
    assert_eq!(report.published(), 5);

    let batches = producer.batches.lock().unwrap().clone();
    for (topic, messages) in batches {
        let index = ["customers", "products", "orders"].iter().position(|t| *t == topic).unwrap();
        let expected = &records[index];
        assert_eq!(messages.len(), expected.len());
        for (message, record) in messages.iter().zip(expected) {
            let back: Value = serde_json::from_str(&message.payload).unwrap();
            assert_eq!(&back, record);
            let key = record.get("id").map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            assert_eq!(message.key, key);
        }
    }
}

#[tokio::test]
async fn failed_publish_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let record = r#"[{"id": "A1"}]"#;
    write_fixtures(dir.path(), record, record, record);

    let loaded = load_fixtures(dir.path(), &TopicAssignment::defaults()).await.unwrap();
    let producer = Arc::new(RecordingProducer {
        fail_topic: Some("products".to_owned()),
        ..RecordingProducer::default()
    });
    let report = run_seed(producer, loaded).await;

    assert!(report.is_complete());
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures().map(|c| c.topic.as_str()).collect::<Vec<_>>(), vec!["products"]);
    assert!(matches!(report.into_result(false), Err(SeedError::Incomplete { failed: 1, expected: 3 })));
}

#[tokio::test]
async fn malformed_fixture_stops_before_publishing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path(), r#"[{"id": "A1"}]"#, r#"[{"id": "#, r#"[{"id": "A1"}]"#);

    let err = load_fixtures(dir.path(), &TopicAssignment::defaults()).await.unwrap_err();
    assert!(matches!(err, SeedError::Parse { .. }), "{:?}", err);
}

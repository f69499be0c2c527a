use crate::configs::AppConfig;
use crate::configs::ProducerKind;
use crate::configs::TopicAssignment;
use crate::dispatcher::dispatch;
use crate::error::Result;
use crate::fixture::load_fixtures;
use crate::fixture::Fixture;
use crate::gate::CompletionGate;
use crate::gate::GateReport;
use crate::interface::BatchProducer;
use crate::interface::DryRunProducer;
use crate::jobs::resolve_assignments;
use crate::rdkafka_impl::RdkafkaProducer;
use std::sync::Arc;

/// Dispatches every loaded fixture at once and waits until all of them reported back.
pub async fn run_seed<P: BatchProducer + 'static>(producer: Arc<P>, loaded: Vec<(TopicAssignment, Fixture)>) -> GateReport {
    let gate = CompletionGate::new(loaded.len());
    for (assignment, fixture) in loaded {
        debug!("Dispatching {} records from {} to {}", fixture.records.len(), fixture.path.display(), assignment.topic);
        dispatch(Arc::clone(&producer), &assignment, fixture.records, gate.handle());
    }
    gate.wait().await
}

async fn seed_with<P: BatchProducer + 'static>(config: &AppConfig, loaded: Vec<(TopicAssignment, Fixture)>) -> Result<GateReport> {
    let producer = Arc::new(P::from_config(config.kafka.clone())?);
    run_seed(producer, loaded).await.into_result(config.lenient)
}

/// Loads all fixtures, then publishes them through the configured producer.
/// No producer is created when a fixture fails to load.
pub async fn seed(config: &AppConfig) -> Result<GateReport> {
    let assignments = resolve_assignments(config.jobs_file.as_deref()).await?;
    let loaded = load_fixtures(&config.data_dir, &assignments).await?;
    match config.producer {
        ProducerKind::Rdkafka => seed_with::<RdkafkaProducer>(config, loaded).await,
        ProducerKind::DryRun => seed_with::<DryRunProducer>(config, loaded).await,
    }
}

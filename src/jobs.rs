use crate::configs::TopicAssignment;
use crate::configs::DEFAULT_KEY_FIELD;
use crate::error::Result;
use crate::error::SeedError;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Defines the producer job to dump the specified fixture file to kafka.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProducerJob {
    topic_name: String,

    /// The fixture path, relative paths resolve against the data directory.
    file: PathBuf,

    /// The record field used as message key.
    #[serde(default = "default_key_field")]
    key: String,
}

fn default_key_field() -> String { DEFAULT_KEY_FIELD.to_owned() }

impl From<ProducerJob> for TopicAssignment {
    fn from(job: ProducerJob) -> Self { TopicAssignment::new(job.file, job.topic_name, job.key) }
}

/// The jobs config. All jobs are published concurrently.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct JobsConfig {
    producer_jobs: Vec<ProducerJob>,
}

impl JobsConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: JobsConfig = serde_yaml::from_str(content).map_err(|e| SeedError::Config(format!("Cannot parse jobs: {}", e)))?;
        if config.producer_jobs.is_empty() {
            return Err(SeedError::Config("Jobs file lists no producer jobs".to_owned()));
        }
        Ok(config)
    }

    /// Read YAML config from file path.
    pub async fn from_config_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SeedError::Config(format!("Cannot read jobs file {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn into_assignments(self) -> Vec<TopicAssignment> { self.producer_jobs.into_iter().map(TopicAssignment::from).collect() }
}

/// The jobs file when one is given, otherwise the built-in customers/products/orders jobs.
pub async fn resolve_assignments(jobs_file: Option<&Path>) -> Result<Vec<TopicAssignment>> {
    match jobs_file {
        Some(path) => {
            info!("Loading jobs from {}", path.display());
            Ok(JobsConfig::from_config_file(path).await?.into_assignments())
        },
        None => Ok(TopicAssignment::defaults()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jobs_with_default_key() {
        let yaml = r#"
producer_jobs:
  - topic_name: customers
    file: customers.json
  - topic_name: invoices
    file: /srv/fixtures/invoices.json
    key: invoice_no
"#;
        let assignments = JobsConfig::from_yaml(yaml).unwrap().into_assignments();
        assert_eq!(
            assignments,
            vec![
                TopicAssignment::new("customers.json", "customers", "id"),
                TopicAssignment::new("/srv/fixtures/invoices.json", "invoices", "invoice_no"),
            ]
        );
    }

    #[test]
    fn empty_jobs_are_rejected() {
        assert!(matches!(JobsConfig::from_yaml("producer_jobs: []"), Err(SeedError::Config(_))));
    }

    #[test]
    fn missing_topic_is_rejected() {
        let yaml = "producer_jobs:\n  - file: a.json\n";
        assert!(matches!(JobsConfig::from_yaml(yaml), Err(SeedError::Config(_))));
    }

    #[tokio::test]
    async fn no_jobs_file_means_defaults() {
        assert_eq!(resolve_assignments(None).await.unwrap(), TopicAssignment::defaults());
    }
}

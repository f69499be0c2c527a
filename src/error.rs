use rdkafka::error::KafkaError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Cannot read fixture {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse fixture {}: {source}", .path.display())]
    Parse {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Fixture {} is not a json array", .0.display())]
    NotAnArray(PathBuf),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to publish to topic {topic}: {source}")]
    Publish {
        topic:  String,
        #[source]
        source: KafkaError,
    },
    #[error("{failed} of {expected} publishes did not succeed")]
    Incomplete { failed: usize, expected: usize },
    #[error(transparent)]
    Kafka(#[from] KafkaError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeedError>;

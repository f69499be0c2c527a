use crate::configs::TopicAssignment;
use crate::error::Result;
use crate::error::SeedError;
use serde_json::Value;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub path:    PathBuf,
    pub records: Vec<Value>,
}

/// Reads `path` and parses it as a json array of records.
pub async fn load_fixture(path: impl AsRef<Path>) -> Result<Fixture> {
    let path = path.as_ref().to_path_buf();
    let content = tokio::fs::read_to_string(&path).await.map_err(|source| SeedError::Io { path: path.clone(), source })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| SeedError::Parse { path: path.clone(), source })?;
    match value {
        Value::Array(records) => {
            info!("Read fixture {} ({} records)", path.display(), records.len());
            Ok(Fixture { path, records })
        },
        _ => Err(SeedError::NotAnArray(path)),
    }
}

/// Loads the fixture of every assignment in order, one read at a time.
/// Stops at the first failure.
pub async fn load_fixtures(data_dir: &Path, assignments: &[TopicAssignment]) -> Result<Vec<(TopicAssignment, Fixture)>> {
    let mut loaded = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let fixture = load_fixture(data_dir.join(&assignment.file)).await?;
        loaded.push((assignment.clone(), fixture));
    }
    Ok(loaded)
}

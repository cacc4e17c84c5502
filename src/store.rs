// src/store.rs

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::path::PathBuf;

use crate::error::AppError;

pub const USERS: &str = "users";
pub const COURSES: &str = "courses";
pub const ENROLLMENTS: &str = "enrollments";
pub const PROGRESS: &str = "progress";
pub const QUIZ_RESULTS: &str = "quiz_results";

const COLLECTIONS: [&str; 5] = [USERS, COURSES, ENROLLMENTS, PROGRESS, QUIZ_RESULTS];

/// Whole-file JSON record store.
///
/// Each collection lives in its own file (`<data_dir>/<name>.json`) as a
/// single object holding one array under the collection name, e.g.
/// `{"users": [...]}`. Every read loads the full file; every write rewrites it.
///
/// There is no locking: two concurrent writers to the same collection race
/// and the last write wins. Callers follow a read-modify-write pattern per
/// request and accept that limitation.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn file_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }

    /// Creates the data directory and seeds every missing collection file
    /// with an empty array. Called once at boot.
    pub async fn ensure_files(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        for collection in COLLECTIONS {
            let path = self.file_path(collection);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }
            let empty = json!({ collection: [] });
            tokio::fs::write(&path, serde_json::to_string_pretty(&empty)?).await?;
        }

        Ok(())
    }

    /// Loads all rows of a collection. A missing file reads as empty.
    pub async fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, AppError> {
        let path = self.file_path(collection);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut document: Value = serde_json::from_str(&raw)?;
        let rows = document
            .get_mut(collection)
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new()));

        Ok(serde_json::from_value(rows)?)
    }

    /// Rewrites the whole collection file with the given rows.
    pub async fn save<T: Serialize>(&self, collection: &str, rows: &[T]) -> Result<(), AppError> {
        let path = self.file_path(collection);
        let document = json!({ collection: rows });
        tokio::fs::write(&path, serde_json::to_string_pretty(&document)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
        value: i64,
    }

    fn temp_store() -> Store {
        let dir = std::env::temp_dir().join(format!("coursedeck-store-{}", uuid::Uuid::new_v4()));
        Store::new(dir)
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let store = temp_store();
        let rows: Vec<Row> = store.load(USERS).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trip() {
        let store = temp_store();
        store.ensure_files().await.unwrap();

        let rows = vec![
            Row {
                id: "a".to_string(),
                value: 1,
            },
            Row {
                id: "b".to_string(),
                value: 2,
            },
        ];
        store.save(COURSES, &rows).await.unwrap();

        let loaded: Vec<Row> = store.load(COURSES).await.unwrap();
        assert_eq!(loaded, rows);
    }

    #[tokio::test]
    async fn ensure_files_seeds_empty_collections() {
        let store = temp_store();
        store.ensure_files().await.unwrap();

        for collection in COLLECTIONS {
            let rows: Vec<Row> = store.load(collection).await.unwrap();
            assert!(rows.is_empty(), "{} should start empty", collection);
        }
    }
}

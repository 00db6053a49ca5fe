use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::selector::{matches_filter, CandidateFilter};
use crate::models::Companion;

/// Errors that can occur when reading the companion pool
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid pool data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Read-only access to the companion pool.
///
/// The pool is an external data source; the engine never writes to it.
/// `query` is the filtered lookup, `scan` the unfiltered bounded lookup used
/// by the guarantee fallback.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn query(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<Companion>, StoreError>;

    async fn scan(&self, limit: usize) -> Result<Vec<Companion>, StoreError>;
}

/// In-memory companion pool.
///
/// Backs the CLI runner when given a seed file, and the test suite. Accepts
/// the seed-file shape `{"companions": [...]}`.
pub struct MemoryStore {
    companions: Vec<Companion>,
}

#[derive(Deserialize)]
struct CompanionFile {
    companions: Vec<Companion>,
}

impl MemoryStore {
    pub fn new(companions: Vec<Companion>) -> Self {
        Self { companions }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let file: CompanionFile = serde_json::from_str(json)?;
        Ok(Self::new(file.companions))
    }

    pub fn len(&self) -> usize {
        self.companions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companions.is_empty()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn query(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<Companion>, StoreError> {
        Ok(self
            .companions
            .iter()
            .filter(|companion| matches_filter(companion, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Companion>, StoreError> {
        Ok(self.companions.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion(id: &str, gender: &str) -> Companion {
        Companion {
            id: id.to_string(),
            name: format!("Companion {}", id),
            age: Some(25),
            gender: gender.to_string(),
            country: None,
            ethnicity: None,
            personality: None,
            traits: vec![],
            interests: vec![],
            backstory: None,
            profile_image_url: None,
            created_at: None,
        }
    }

    #[test]
    fn test_query_filters_and_bounds() {
        let store = MemoryStore::new(vec![
            companion("1", "Female"),
            companion("2", "Male"),
            companion("3", "Female"),
        ]);
        let filter = CandidateFilter {
            gender: Some("Female".to_string()),
            ..Default::default()
        };

        let all = tokio_test::block_on(store.query(&filter, 50)).unwrap();
        assert_eq!(all.len(), 2);

        let bounded = tokio_test::block_on(store.query(&filter, 1)).unwrap();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0].id, "1");
    }

    #[test]
    fn test_scan_ignores_filters() {
        let store = MemoryStore::new(vec![companion("1", "Female"), companion("2", "Male")]);
        let scanned = tokio_test::block_on(store.scan(50)).unwrap();
        assert_eq!(scanned.len(), 2);
    }

    #[test]
    fn test_from_json_seed_shape() {
        let store = MemoryStore::from_json(
            r#"{
                "companions": [
                    {"id": "c1", "name": "Luna", "gender": "Female", "traits": "[\"warm\"]"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(MemoryStore::from_json("not json").is_err());
        assert!(MemoryStore::from_json(r#"{"companions": "nope"}"#).is_err());
    }
}

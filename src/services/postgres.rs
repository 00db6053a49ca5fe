use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::core::selector::CandidateFilter;
use crate::models::{parse_string_list, Companion};
use crate::services::store::{CandidateStore, StoreError};

const COMPANION_COLUMNS: &str = "id, name, age, gender, country, ethnicity, personality, \
     traits, interests, backstory, profile_image_url, created_at";

/// Read-only Postgres adapter over the `companions` table.
///
/// The table is owned and populated elsewhere; this client only selects from
/// it. Trait/interest columns hold serialized JSON text and are parsed
/// leniently.
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to companion pool at: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn query(
        &self,
        filter: &CandidateFilter,
        limit: usize,
    ) -> Result<Vec<Companion>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM companions WHERE 1=1",
            COMPANION_COLUMNS
        ));

        if let Some(gender) = &filter.gender {
            builder.push(" AND gender = ").push_bind(gender.as_str());
        }
        if let Some(country) = &filter.country {
            builder.push(" AND country = ").push_bind(country.as_str());
        }
        if let Some(ethnicity) = &filter.ethnicity {
            builder.push(" AND ethnicity = ").push_bind(ethnicity.as_str());
        }
        if let Some((min_age, max_age)) = filter.age_range {
            builder
                .push(" AND age BETWEEN ")
                .push_bind(min_age as i32)
                .push(" AND ")
                .push_bind(max_age as i32);
        }

        builder.push(" LIMIT ").push_bind(limit as i64);

        let rows = builder.build().fetch_all(&self.pool).await?;

        tracing::debug!("Filtered companion query returned {} rows", rows.len());

        Ok(rows.iter().map(row_to_companion).collect())
    }

    async fn scan(&self, limit: usize) -> Result<Vec<Companion>, StoreError> {
        let query = format!("SELECT {} FROM companions LIMIT $1", COMPANION_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Unfiltered companion scan returned {} rows", rows.len());

        Ok(rows.iter().map(row_to_companion).collect())
    }
}

fn row_to_companion(row: &PgRow) -> Companion {
    let traits: Option<String> = row.get("traits");
    let interests: Option<String> = row.get("interests");
    let age: Option<i32> = row.get("age");

    Companion {
        id: row.get("id"),
        name: row.get("name"),
        age: age.and_then(|a| u32::try_from(a).ok()),
        gender: row.get("gender"),
        country: row.get("country"),
        ethnicity: row.get("ethnicity"),
        personality: row.get("personality"),
        traits: parse_string_list(traits.as_deref()),
        interests: parse_string_list(interests.as_deref()),
        backstory: row.get("backstory"),
        profile_image_url: row.get("profile_image_url"),
        created_at: row.get("created_at"),
    }
}

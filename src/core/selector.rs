use std::sync::Arc;

use crate::models::{Companion, MatchCriteria};
use crate::services::{CandidateStore, StoreError};

/// Youngest selectable companion age; the age window never dips below it.
pub const MIN_SELECTABLE_AGE: u32 = 18;

/// Exact-match filters applied when selecting candidates from the pool.
///
/// A `None` field imposes no constraint. SQL-backed stores translate this
/// into `WHERE` clauses; in-memory stores apply [`matches_filter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub gender: Option<String>,
    pub country: Option<String>,
    pub ethnicity: Option<String>,
    /// Inclusive age window.
    pub age_range: Option<(u32, u32)>,
}

impl CandidateFilter {
    pub fn from_criteria(criteria: &MatchCriteria) -> Self {
        Self {
            gender: criteria.gender.clone(),
            country: criteria.country.clone(),
            ethnicity: criteria.ethnicity.clone(),
            age_range: criteria.age.map(age_window),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

/// Selection window for an age preference: ten years either side, floored at
/// the minimum selectable age. Independent of the proximity tiers used in
/// scoring.
pub fn age_window(age: u32) -> (u32, u32) {
    (age.saturating_sub(10).max(MIN_SELECTABLE_AGE), age + 10)
}

/// Check a companion against the exact-match filters.
///
/// A companion without a recorded age fails any age window, matching the
/// SQL `BETWEEN` behavior on a NULL column.
#[inline]
pub fn matches_filter(companion: &Companion, filter: &CandidateFilter) -> bool {
    if let Some(gender) = &filter.gender {
        if companion.gender != *gender {
            return false;
        }
    }

    if let Some(country) = &filter.country {
        if companion.country.as_deref() != Some(country.as_str()) {
            return false;
        }
    }

    if let Some(ethnicity) = &filter.ethnicity {
        if companion.ethnicity.as_deref() != Some(ethnicity.as_str()) {
            return false;
        }
    }

    if let Some((min_age, max_age)) = filter.age_range {
        match companion.age {
            Some(age) if age >= min_age && age <= max_age => {}
            _ => return false,
        }
    }

    true
}

/// Candidate Selector: produces the initial candidate subset from the pool.
///
/// Filtered selection is the normal path; the unfiltered bounded scan is a
/// distinct mode invoked only by the ranking engine's guarantee cascade.
#[derive(Clone)]
pub struct Selector {
    store: Arc<dyn CandidateStore>,
}

impl Selector {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self { store }
    }

    /// Filtered lookup driven by the normalized criteria.
    pub async fn select(
        &self,
        criteria: &MatchCriteria,
        limit: usize,
    ) -> Result<Vec<Companion>, StoreError> {
        let filter = CandidateFilter::from_criteria(criteria);
        tracing::debug!("Selecting candidates with filter {:?}, limit {}", filter, limit);
        self.store.query(&filter, limit).await
    }

    /// Unfiltered bounded scan of the pool.
    pub async fn select_unfiltered(&self, limit: usize) -> Result<Vec<Companion>, StoreError> {
        tracing::debug!("Selecting candidates without filters, limit {}", limit);
        self.store.scan(limit).await
    }
}

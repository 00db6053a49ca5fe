use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::scoring::{rank_candidates, BASE_SCORE};
use crate::core::selector::Selector;
use crate::models::{Companion, MatchRequest, MatchResponse, ScoredCompanion};
use crate::services::{CandidateStore, StoreError};

/// Errors surfaced by the ranking engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Candidate pool lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Sizing knobs for a ranking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Floor on the number of returned matches whenever the pool allows it.
    pub min_results: usize,
    /// Cap on the filtered selection read from the pool.
    pub pool_limit: usize,
    /// Cap on the unfiltered fallback scan.
    pub fallback_scan_limit: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            min_results: 3,
            pool_limit: 500,
            fallback_scan_limit: 50,
        }
    }
}

/// Fallback stages of the minimum-result guarantee, tried strictly in order.
/// Each stage contributes only companions not already selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuaranteeStage {
    /// The scored, filtered selection.
    Ranked,
    /// Lower-ranked leftovers from the filtered pool, in score order.
    Remaining,
    /// Unfiltered bounded scan, entered at the base score.
    Unfiltered,
}

const GUARANTEE_CASCADE: [GuaranteeStage; 3] = [
    GuaranteeStage::Ranked,
    GuaranteeStage::Remaining,
    GuaranteeStage::Unfiltered,
];

/// Ranking engine: scores a candidate selection, sorts it, and enforces the
/// minimum-result guarantee.
///
/// Each invocation is a pure function of the request and the pool snapshot;
/// the engine keeps no state across calls and never writes anywhere.
#[derive(Clone)]
pub struct MatchEngine {
    selector: Selector,
    limits: MatchLimits,
}

impl MatchEngine {
    pub fn new(selector: Selector, limits: MatchLimits) -> Self {
        Self { selector, limits }
    }

    pub fn with_defaults(store: Arc<dyn CandidateStore>) -> Self {
        Self::new(Selector::new(store), MatchLimits::default())
    }

    /// Match companions against the request's preferences.
    ///
    /// Returns a best-effort ranked list whenever the pool is reachable: an
    /// under-filled result is reported through `has_enough_matches`, never
    /// as an error. Only a pool lookup failure is fatal.
    pub async fn rank(&self, request: &MatchRequest) -> Result<MatchResponse, MatchError> {
        let preferences = request.preferences().clone();
        let criteria = preferences.criteria();

        info!(
            "Matching request: gender={:?}, country={:?}, ethnicity={:?}, age={:?}, {} traits, {} interests",
            criteria.gender,
            criteria.country,
            criteria.ethnicity,
            criteria.age,
            criteria.personality_traits.len(),
            criteria.interests.len()
        );

        let candidates = self.selector.select(&criteria, self.limits.pool_limit).await?;
        info!("Found {} companions after initial filtering", candidates.len());

        let ranked = rank_candidates(&criteria, candidates);
        let total_matches = ranked.len();

        let matches = self.fill_quota(ranked).await?;

        let has_enough_matches = matches.len() >= self.limits.min_results;
        info!(
            "Final result: {} matches (minimum: {})",
            matches.len(),
            self.limits.min_results
        );

        Ok(MatchResponse {
            matches,
            total_matches,
            has_enough_matches,
            user_profile: request.user_profile.clone(),
            partner_preferences: preferences,
        })
    }

    /// Minimum-result guarantee: walk the stage cascade, accumulating
    /// deduplicated results until the quota is met or every source is
    /// exhausted.
    async fn fill_quota(
        &self,
        ranked: Vec<ScoredCompanion>,
    ) -> Result<Vec<ScoredCompanion>, MatchError> {
        let min_results = self.limits.min_results;
        let mut remaining = ranked;
        let mut selected: Vec<ScoredCompanion> = Vec::new();

        for stage in GUARANTEE_CASCADE {
            if stage != GuaranteeStage::Ranked && selected.len() >= min_results {
                break;
            }

            match stage {
                GuaranteeStage::Ranked => {
                    // min_results is a floor, not a cap: every companion that
                    // survived the filters stays in the result.
                    selected.append(&mut remaining);
                }
                GuaranteeStage::Remaining => {
                    let needed = (min_results - selected.len()).min(remaining.len());
                    selected.extend(remaining.drain(..needed));
                }
                GuaranteeStage::Unfiltered => {
                    debug!(
                        "Still need {} more matches, scanning pool without filters",
                        min_results - selected.len()
                    );
                    let scan = self
                        .selector
                        .select_unfiltered(self.limits.fallback_scan_limit)
                        .await?;
                    let picked: HashSet<String> = selected
                        .iter()
                        .map(|m| m.companion.id.clone())
                        .collect();

                    for companion in scan {
                        if selected.len() >= min_results {
                            break;
                        }
                        if picked.contains(&companion.id) {
                            continue;
                        }
                        selected.push(fallback_match(companion));
                    }
                }
            }
        }

        Ok(selected)
    }
}

/// An unfiltered-scan companion enters at the fixed base score, with a
/// detail entry marking it as a fallback match.
fn fallback_match(companion: Companion) -> ScoredCompanion {
    ScoredCompanion {
        companion,
        match_score: BASE_SCORE,
        score_details: vec!["Base score: +1 (fallback match)".to_string()],
    }
}

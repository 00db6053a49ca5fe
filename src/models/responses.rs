use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::{PartnerPreferences, ScoredCompanion};

/// Response for a match request.
///
/// `total_matches` counts the scored filtered set before any truncation;
/// companions appended by the unfiltered fallback are not included in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<ScoredCompanion>,
    pub total_matches: usize,
    pub has_enough_matches: bool,
    pub user_profile: Option<Value>,
    /// Echo of the effective preferences, with trait/interest fields
    /// normalized to arrays.
    pub partner_preferences: PartnerPreferences,
}

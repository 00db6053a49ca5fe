//! Amora Match - Companion matching engine for the Amora chat app
//!
//! This library scores companion profiles against a requester's partner
//! preferences and returns a ranked result list with a minimum-result
//! guarantee: whenever the pool is non-empty, the engine degrades through
//! relaxed selection stages rather than returning "no matches found".

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchEngine, MatchError, MatchLimits, Selector};
pub use crate::models::{Companion, MatchRequest, MatchResponse, PartnerPreferences, ScoredCompanion};
pub use crate::services::{CandidateStore, MemoryStore, PgCandidateStore, StoreError};

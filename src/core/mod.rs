// Core algorithm exports
pub mod engine;
pub mod scoring;
pub mod selector;

pub use engine::{MatchEngine, MatchError, MatchLimits};
pub use scoring::{rank_candidates, score_companion, BASE_SCORE};
pub use selector::{age_window, matches_filter, CandidateFilter, Selector, MIN_SELECTABLE_AGE};

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Companion, MatchCriteria, PartnerPreferences, ScoredCompanion, parse_string_list, ANY_SENTINEL};
pub use requests::MatchRequest;
pub use responses::MatchResponse;

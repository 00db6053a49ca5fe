use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::PartnerPreferences;

/// Request to match companions against a requester's preferences.
///
/// Two payload shapes are accepted: the structured form with a nested
/// `partnerPreferences` object, and the legacy form with the preference
/// fields at the top level. The nested form wins when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Opaque requester profile, echoed back in the response. The engine
    /// never interprets it.
    #[serde(rename = "userProfile", default)]
    pub user_profile: Option<Value>,
    #[serde(rename = "partnerPreferences", default)]
    pub partner_preferences: Option<PartnerPreferences>,
    /// Legacy top-level preference fields.
    #[serde(flatten)]
    pub legacy: PartnerPreferences,
}

impl MatchRequest {
    pub fn new(preferences: PartnerPreferences) -> Self {
        Self {
            user_profile: None,
            partner_preferences: Some(preferences),
            legacy: PartnerPreferences::default(),
        }
    }

    pub fn with_profile(mut self, profile: Value) -> Self {
        self.user_profile = Some(profile);
        self
    }

    /// The effective preferences: nested when given, legacy otherwise.
    pub fn preferences(&self) -> &PartnerPreferences {
        self.partner_preferences.as_ref().unwrap_or(&self.legacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_preferences_win() {
        let request: MatchRequest = serde_json::from_str(
            r#"{
                "partnerPreferences": {"gender": "Female"},
                "gender": "Male"
            }"#,
        )
        .unwrap();
        assert_eq!(request.preferences().gender.as_deref(), Some("Female"));
    }

    #[test]
    fn test_legacy_top_level_fallback() {
        let request: MatchRequest =
            serde_json::from_str(r#"{"gender": "Male", "interests": ["hiking"]}"#).unwrap();
        assert!(request.partner_preferences.is_none());
        assert_eq!(request.preferences().gender.as_deref(), Some("Male"));
        assert_eq!(request.preferences().interests, vec!["hiking".to_string()]);
    }

    #[test]
    fn test_null_nested_preferences_fall_back() {
        let request: MatchRequest =
            serde_json::from_str(r#"{"partnerPreferences": null, "country": "Japan"}"#).unwrap();
        assert_eq!(request.preferences().country.as_deref(), Some("Japan"));
    }

    #[test]
    fn test_empty_request_means_no_preference() {
        let request: MatchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(*request.preferences(), PartnerPreferences::default());
        assert!(request.user_profile.is_none());
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The "no preference" sentinel sent by clients for exact-match fields.
pub const ANY_SENTINEL: &str = "Any";

/// A companion profile from the candidate pool.
///
/// `traits` and `interests` are stored as serialized JSON text in the pool;
/// malformed or absent text deserializes to an empty list, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    pub gender: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default, deserialize_with = "de_stored_list")]
    pub traits: Vec<String>,
    #[serde(default, deserialize_with = "de_stored_list")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub backstory: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Partner preferences as sent by the client (wire form).
///
/// Every field is optional: an absent or empty field means "no preference",
/// never a hard mismatch. `personalityTraits` and `interests` coerce any
/// non-array value to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerPreferences {
    #[serde(default, deserialize_with = "de_flexible_age")]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "personalityTraits", default, deserialize_with = "de_string_array")]
    pub personality_traits: Vec<String>,
    #[serde(default, deserialize_with = "de_string_array")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
}

impl PartnerPreferences {
    /// Normalize into scoring/selection criteria: the `"Any"` sentinel and
    /// empty strings become `None` here and are never seen downstream.
    pub fn criteria(&self) -> MatchCriteria {
        MatchCriteria {
            age: self.age,
            gender: exact_preference(&self.gender),
            country: exact_preference(&self.country),
            ethnicity: exact_preference(&self.ethnicity),
            personality_traits: self.personality_traits.clone(),
            interests: self.interests.clone(),
        }
    }
}

/// Normalized preferences consumed by the selector and the scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchCriteria {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub ethnicity: Option<String>,
    pub personality_traits: Vec<String>,
    pub interests: Vec<String>,
}

/// A companion with its computed match score and contribution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCompanion {
    #[serde(flatten)]
    pub companion: Companion,
    pub match_score: u32,
    pub score_details: Vec<String>,
}

fn exact_preference(value: &Option<String>) -> Option<String> {
    match value.as_deref() {
        Some("") | Some(ANY_SENTINEL) | None => None,
        Some(v) => Some(v.to_string()),
    }
}

/// Parse a serialized trait/interest column. Non-JSON text, non-array JSON
/// and non-string entries all degrade to "no data".
pub fn parse_string_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => collect_strings(items),
        _ => Vec::new(),
    }
}

fn collect_strings(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Accepts a JSON array of strings; anything else coerces to an empty list.
fn de_string_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => collect_strings(items),
        _ => Vec::new(),
    })
}

/// Accepts a JSON array, or a string holding a serialized JSON array (the
/// pool's storage format); anything else coerces to an empty list.
fn de_stored_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => collect_strings(items),
        Some(Value::String(raw)) => parse_string_list(Some(&raw)),
        _ => Vec::new(),
    })
}

/// Accepts an age as an integer or a numeric string; anything else means
/// "no preference".
fn de_flexible_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_age))
}

fn parse_age(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

// Integration tests for Amora Match

use std::collections::HashSet;
use std::sync::Arc;

use amora_match::core::{MatchEngine, MatchLimits, Selector, BASE_SCORE};
use amora_match::models::{Companion, MatchRequest, PartnerPreferences};
use amora_match::services::MemoryStore;

fn create_companion(id: &str, age: u32, gender: &str, country: &str) -> Companion {
    Companion {
        id: id.to_string(),
        name: format!("Companion {}", id),
        age: Some(age),
        gender: gender.to_string(),
        country: Some(country.to_string()),
        ethnicity: None,
        personality: Some("warm and curious".to_string()),
        traits: vec!["warmth".to_string()],
        interests: vec!["travel".to_string(), "music".to_string()],
        backstory: None,
        profile_image_url: None,
        created_at: None,
    }
}

fn engine_over(pool: Vec<Companion>) -> MatchEngine {
    MatchEngine::with_defaults(Arc::new(MemoryStore::new(pool)))
}

fn request(preferences: PartnerPreferences) -> MatchRequest {
    MatchRequest::new(preferences)
}

#[tokio::test]
async fn test_end_to_end_ranking() {
    let pool = vec![
        create_companion("1", 26, "Female", "Japan"),   // age +4
        create_companion("2", 35, "Female", "Japan"),   // age +1
        create_companion("3", 31, "Female", "Japan"),   // age +2
        create_companion("4", 45, "Female", "Japan"),   // outside the window
        create_companion("5", 27, "Male", "Japan"),     // wrong gender
    ];

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            age: Some(27),
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    // The age window (18..=37) and gender filter leave three.
    assert_eq!(response.total_matches, 3);
    assert!(response.has_enough_matches);

    let ids: Vec<&str> = response
        .matches
        .iter()
        .map(|m| m.companion.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "3", "2"]);

    // Descending scores throughout.
    for pair in response.matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
}

#[tokio::test]
async fn test_min_results_is_floor_not_cap() {
    let pool: Vec<Companion> = (0..8)
        .map(|i| create_companion(&i.to_string(), 25, "Female", "Japan"))
        .collect();

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    // All eight qualify and all eight come back.
    assert_eq!(response.matches.len(), 8);
    assert_eq!(response.total_matches, 8);
}

#[tokio::test]
async fn test_unfiltered_fallback_fills_quota() {
    let pool = vec![
        create_companion("match", 27, "Female", "Japan"),
        create_companion("other-1", 30, "Male", "Brazil"),
        create_companion("other-2", 50, "Male", "Brazil"),
    ];

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(response.matches.len(), 3);
    assert!(response.has_enough_matches);
    assert_eq!(response.total_matches, 1);

    assert_eq!(response.matches[0].companion.id, "match");
    for fill in &response.matches[1..] {
        assert_eq!(fill.match_score, BASE_SCORE);
        assert!(fill.score_details[0].contains("fallback match"));
    }
}

#[tokio::test]
async fn test_two_candidate_pool_with_min_three() {
    let pool = vec![
        create_companion("1", 27, "Female", "Japan"),
        create_companion("2", 30, "Male", "Brazil"),
    ];

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    // No third companion exists anywhere: best effort, flagged, no error.
    assert_eq!(response.matches.len(), 2);
    assert!(!response.has_enough_matches);
}

#[tokio::test]
async fn test_no_duplicate_ids_across_stages() {
    let pool = vec![
        create_companion("a", 27, "Female", "Japan"),
        create_companion("b", 28, "Female", "Japan"),
        create_companion("c", 40, "Male", "Brazil"),
    ];

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    let mut seen = HashSet::new();
    for m in &response.matches {
        assert!(seen.insert(m.companion.id.clone()), "duplicate id {}", m.companion.id);
    }
    assert_eq!(response.matches.len(), 3);
}

#[tokio::test]
async fn test_ties_preserve_selector_order() {
    // Identical profiles score identically; the stable sort keeps pool order.
    let pool = vec![
        create_companion("first", 25, "Female", "Japan"),
        create_companion("second", 25, "Female", "Japan"),
        create_companion("third", 25, "Female", "Japan"),
    ];

    let response = engine_over(pool)
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    let ids: Vec<&str> = response
        .matches
        .iter()
        .map(|m| m.companion.id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_empty_pool_yields_empty_result() {
    let response = engine_over(vec![])
        .rank(&request(PartnerPreferences::default()))
        .await
        .unwrap();

    assert!(response.matches.is_empty());
    assert_eq!(response.total_matches, 0);
    assert!(!response.has_enough_matches);
}

#[tokio::test]
async fn test_empty_preference_arrays_do_not_error() {
    let pool = vec![create_companion("1", 25, "Female", "Japan")];

    let payload = r#"{
        "partnerPreferences": {
            "personalityTraits": [],
            "interests": []
        }
    }"#;
    let parsed: MatchRequest = serde_json::from_str(payload).unwrap();

    let response = engine_over(pool).rank(&parsed).await.unwrap();
    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].match_score, BASE_SCORE);
}

#[tokio::test]
async fn test_legacy_payload_matches_nested_form() {
    let pool = vec![
        create_companion("1", 27, "Female", "Japan"),
        create_companion("2", 30, "Male", "Brazil"),
        create_companion("3", 26, "Female", "Japan"),
    ];

    let nested: MatchRequest = serde_json::from_str(
        r#"{"partnerPreferences": {"gender": "Female", "age": 27}}"#,
    )
    .unwrap();
    let legacy: MatchRequest = serde_json::from_str(r#"{"gender": "Female", "age": 27}"#).unwrap();

    let engine = engine_over(pool);
    let from_nested = engine.rank(&nested).await.unwrap();
    let from_legacy = engine.rank(&legacy).await.unwrap();

    assert_eq!(from_nested.matches, from_legacy.matches);
    assert_eq!(from_nested.total_matches, from_legacy.total_matches);
}

#[tokio::test]
async fn test_idempotent_byte_identical_output() {
    let pool = vec![
        create_companion("1", 27, "Female", "Japan"),
        create_companion("2", 30, "Male", "Brazil"),
        create_companion("3", 26, "Female", "Japan"),
    ];
    let engine = engine_over(pool);
    let req = request(PartnerPreferences {
        age: Some(27),
        gender: Some("Female".to_string()),
        personality_traits: vec!["warm".to_string()],
        interests: vec!["travel".to_string()],
        ..Default::default()
    });

    let first = serde_json::to_string(&engine.rank(&req).await.unwrap()).unwrap();
    let second = serde_json::to_string(&engine.rank(&req).await.unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_malformed_stored_traits_degrade_to_base() {
    let store = MemoryStore::from_json(
        r#"{
            "companions": [
                {
                    "id": "c1",
                    "name": "Luna",
                    "age": 25,
                    "gender": "Female",
                    "traits": "{definitely not an array",
                    "interests": "also broken"
                }
            ]
        }"#,
    )
    .unwrap();

    let engine = MatchEngine::with_defaults(Arc::new(store));
    let response = engine
        .rank(&request(PartnerPreferences {
            personality_traits: vec!["warm".to_string()],
            interests: vec!["travel".to_string()],
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].match_score, BASE_SCORE);
}

#[tokio::test]
async fn test_custom_limits_respected() {
    let pool: Vec<Companion> = (0..20)
        .map(|i| create_companion(&i.to_string(), 25, "Male", "Brazil"))
        .collect();

    let engine = MatchEngine::new(
        Selector::new(Arc::new(MemoryStore::new(pool))),
        MatchLimits {
            min_results: 5,
            pool_limit: 500,
            fallback_scan_limit: 50,
        },
    );

    // Gender filter matches nothing; the quota of five is filled entirely
    // from the unfiltered scan.
    let response = engine
        .rank(&request(PartnerPreferences {
            gender: Some("Female".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(response.matches.len(), 5);
    assert_eq!(response.total_matches, 0);
    assert!(response.has_enough_matches);
}

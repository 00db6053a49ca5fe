use crate::models::{Companion, MatchCriteria, ScoredCompanion};

/// Score every companion gets before any signal is counted.
pub const BASE_SCORE: u32 = 1;

/// Compute a companion's match score against the normalized criteria.
///
/// The score is additive:
/// - +3 per requested personality trait found in the free-text personality
/// - +2 per companion trait entry containing a requested trait
/// - +2 per companion interest entry containing a requested interest
/// - +5 / +3 / +3 for exact gender / country / ethnicity matches
/// - +4 / +2 / +1 for age difference within 2 / 5 / 10 years
/// - +1 base score for every companion
///
/// Trait and interest containment is case-insensitive; a requested trait may
/// score against both the personality text and several trait entries, and
/// the contributions stack. Attribute bonuses apply whether or not the selection
/// stage already filtered on that attribute, so unfiltered fallback
/// candidates still earn them.
pub fn score_companion(criteria: &MatchCriteria, companion: &Companion) -> (u32, Vec<String>) {
    let mut score = 0u32;
    let mut details = Vec::new();

    let personality = companion
        .personality
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    for trait_pref in &criteria.personality_traits {
        if trait_pref.is_empty() {
            continue;
        }
        let needle = trait_pref.to_lowercase();

        if personality.contains(&needle) {
            score += 3;
            details.push(format!("Personality trait \"{}\" matched: +3", trait_pref));
        }

        for companion_trait in &companion.traits {
            if !companion_trait.is_empty() && companion_trait.to_lowercase().contains(&needle) {
                score += 2;
                details.push(format!(
                    "Trait \"{}\" matched with \"{}\": +2",
                    trait_pref, companion_trait
                ));
            }
        }
    }

    for interest in &criteria.interests {
        if interest.is_empty() {
            continue;
        }
        let needle = interest.to_lowercase();

        for companion_interest in &companion.interests {
            if !companion_interest.is_empty()
                && companion_interest.to_lowercase().contains(&needle)
            {
                score += 2;
                details.push(format!(
                    "Interest \"{}\" matched with \"{}\": +2",
                    interest, companion_interest
                ));
            }
        }
    }

    if let Some(gender) = &criteria.gender {
        if companion.gender == *gender {
            score += 5;
            details.push("Gender match: +5".to_string());
        }
    }

    if let Some(country) = &criteria.country {
        if companion.country.as_deref() == Some(country.as_str()) {
            score += 3;
            details.push("Country match: +3".to_string());
        }
    }

    if let Some(ethnicity) = &criteria.ethnicity {
        if companion.ethnicity.as_deref() == Some(ethnicity.as_str()) {
            score += 3;
            details.push("Ethnicity match: +3".to_string());
        }
    }

    if let (Some(preferred_age), Some(age)) = (criteria.age, companion.age) {
        let diff = preferred_age.abs_diff(age);
        if diff <= 2 {
            score += 4;
            details.push(format!("Age very close ({} years): +4", diff));
        } else if diff <= 5 {
            score += 2;
            details.push(format!("Age close ({} years): +2", diff));
        } else if diff <= 10 {
            score += 1;
            details.push(format!("Age within range ({} years): +1", diff));
        }
    }

    // The base score is recorded last, after every earned contribution.
    score += BASE_SCORE;
    details.push("Base score: +1".to_string());

    (score, details)
}

/// Score a batch of companions and sort descending.
///
/// The sort is stable: companions with equal scores keep the selector's
/// original relative order. That tie-break is intentional; there is no
/// secondary key.
pub fn rank_candidates(criteria: &MatchCriteria, candidates: Vec<Companion>) -> Vec<ScoredCompanion> {
    let mut scored: Vec<ScoredCompanion> = candidates
        .into_iter()
        .map(|companion| {
            let (match_score, score_details) = score_companion(criteria, &companion);
            tracing::debug!(
                "Companion \"{}\" scored {} ({} contributions)",
                companion.name,
                match_score,
                score_details.len()
            );
            ScoredCompanion {
                companion,
                match_score,
                score_details,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored
}

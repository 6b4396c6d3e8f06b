//! End-to-end ranking tests: phrase -> compiled tiers -> store -> ordered results.

use pretty_assertions::assert_eq;

use e2e_tests::{result_ids, TestHarness};
use search_types::{CollectionScope, SearchOptions};

/// "quick fox": primary matches, then secondary, then each per-term tier.
#[test]
fn test_quick_fox_tier_order() {
    let harness = TestHarness::new();
    let results = harness.search("quick fox");

    assert_eq!(
        result_ids(&results),
        vec!["fox-title", "news-fox", "fox-blob", "quick-only", "fox-only"]
    );
}

/// "The Quick Brown Fox" scores on the primary tier and both per-term tiers.
#[test]
fn test_quick_fox_scores_on_tiers_one_three_four() {
    let harness = TestHarness::new();
    let results = harness.search("quick fox");
    let top = &results[0];

    assert_eq!(top.document_id, "fox-title");
    assert!(top.score("primary_score").unwrap() >= 3.0);
    assert_eq!(top.score("secondary_score"), Some(0.0));
    assert!(top.score("term_score_1").unwrap() >= 3.0);
    assert!(top.score("term_score_2").unwrap() >= 3.0);
}

/// A tier-1 match always ranks above documents matching only lower tiers.
#[test]
fn test_primary_matches_rank_first() {
    let harness = TestHarness::new();
    let threshold = harness.settings.threshold;

    for phrase in ["quick fox", "fox", "quick", "brown fox", "fox habitats"] {
        let results = harness.search(phrase);
        let first_non_primary = results
            .iter()
            .position(|r| r.primary_score() < threshold)
            .unwrap_or(results.len());
        assert!(
            results[first_non_primary..]
                .iter()
                .all(|r| r.primary_score() < threshold),
            "primary match ranked below a lower-tier match for {:?}",
            phrase
        );
    }
}

/// A two-letter word is never indexed, so only the substring fallback finds it.
#[test]
fn test_two_letter_word_found_by_fallback() {
    let harness = TestHarness::new();
    let results = harness.search("ai");

    assert_eq!(result_ids(&results), vec!["ai-guide"]);
    assert!(!results[0].has_scored_match(harness.settings.threshold));
}

/// The fallback matches the raw phrase, operators included.
#[test]
fn test_fallback_uses_raw_phrase() {
    let harness = TestHarness::new();
    let results = harness.search("C++");

    // "C#" shares the sanitized term "C" but not the raw text
    assert_eq!(result_ids(&results), vec!["cpp-course"]);
}

/// Single-term phrases produce no per-term columns.
#[test]
fn test_single_term_columns() {
    let harness = TestHarness::new();
    let results = harness.search("habitats");

    assert_eq!(result_ids(&results), vec!["fox-only"]);
    let columns: Vec<&str> = results[0]
        .tier_scores
        .iter()
        .map(|s| s.column.as_str())
        .collect();
    assert_eq!(columns, vec!["primary_score", "secondary_score"]);
}

/// An unreachable threshold leaves only substring matches; the fallback
/// itself ignores the threshold.
#[test]
fn test_threshold_only_affects_scored_tiers() {
    let harness = TestHarness::new();
    let options = SearchOptions::new().with_threshold(1000.0);
    let results = harness.search_with("quick fox", &CollectionScope::Any, &options);

    let mut ids = result_ids(&results);
    ids.sort_unstable();
    assert_eq!(ids, vec!["fox-blob", "news-fox"]);
}

/// Lowering the threshold never removes results.
#[test]
fn test_lower_threshold_is_superset() {
    let harness = TestHarness::new();
    let strict = harness.search_with(
        "quick fox",
        &CollectionScope::Any,
        &SearchOptions::new().with_threshold(8.0),
    );
    let loose = harness.search("quick fox");

    for result in &strict {
        assert!(result_ids(&loose).contains(&result.document_id.as_str()));
    }
    assert!(strict.len() < loose.len());
}

/// Limit truncates after ordering.
#[test]
fn test_limit_keeps_top_results() {
    let harness = TestHarness::new();
    let results = harness.search_with(
        "quick fox",
        &CollectionScope::Any,
        &SearchOptions::new().with_limit(2),
    );
    assert_eq!(result_ids(&results), vec!["fox-title", "news-fox"]);
}

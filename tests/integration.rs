//! End-to-end tests for the bundled language catalog.
//!
//! These exercise the full path from raw criterion codes through selection,
//! forward chaining and label rendering, plus the engine properties that
//! must hold for any input.

use std::collections::HashSet;
use std::sync::Arc;

use lang_advisor::advisor::{Advisor, Recommendation};
use lang_advisor::catalog::Catalog;
use lang_advisor::config::{AdvisorConfig, InputPolicy, Locale};
use lang_advisor::inference::InferenceEngine;
use lang_advisor::knowledge::FactRef;

const NO_MATCH: &str = "No matching programming language found. Please choose different criteria.";

fn advisor() -> Advisor {
    Advisor::builtin().unwrap()
}

fn recommend(codes: &[&str]) -> Vec<String> {
    advisor().recommend_labels(codes).unwrap()
}

#[test]
fn system_and_performance_prefers_specific_rule() {
    assert_eq!(
        recommend(&["P_system", "P_performa"]),
        ["C++ (System/Game Engine)"]
    );
}

#[test]
fn web_alone() {
    assert_eq!(recommend(&["P_web"]), ["JavaScript (Frontend/Backend)"]);
}

#[test]
fn web_and_easy_lists_php_first() {
    assert_eq!(
        recommend(&["P_web", "P_easy"]),
        ["PHP (Web Backend)", "JavaScript (Frontend/Backend)"]
    );
}

#[test]
fn empty_selection_is_no_match() {
    assert_eq!(recommend(&[]), [NO_MATCH]);
}

#[test]
fn unknown_code_is_no_match_when_permissive() {
    assert_eq!(recommend(&["P_unknown_code"]), [NO_MATCH]);
}

#[test]
fn mobile_cross_platform_proves_flutter_once() {
    let lines = recommend(&["P_mobile", "P_cross"]);
    assert_eq!(lines, ["Flutter (Dart)", "Kotlin (Native Android/JVM)"]);
    assert_eq!(lines.iter().filter(|l| *l == "Flutter (Dart)").count(), 1);
}

#[test]
fn mobile_beginner_and_cross_still_one_flutter() {
    let lines = recommend(&["P_mobile", "P_pemula", "P_cross"]);
    assert_eq!(lines, ["Flutter (Dart)", "Kotlin (Native Android/JVM)"]);
}

#[test]
fn game_beginner_and_expert() {
    // Both two-premise game rules fire; the general game rule is consumed
    // because C# is already proven.
    assert_eq!(
        recommend(&["P_game", "P_pemula", "P_mahir"]),
        ["C# (Unity)", "Python (Pygame)"]
    );
    assert_eq!(
        recommend(&["P_game", "P_pemula"]),
        ["Python (Pygame)", "C# (Unity)"]
    );
}

#[test]
fn everything_selected_proves_every_conclusion_once() {
    let a = advisor();
    let all: Vec<String> = a.knowledge().criteria().map(|(_, e)| e.id.clone()).collect();
    let lines = a.recommend_labels(&all).unwrap();

    assert_eq!(lines.len(), a.knowledge().conclusions_len());
    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), lines.len());
    assert_eq!(
        &lines[..5],
        [
            "C++ (System/Game Engine)",
            "C# (Unity)",
            "Python (Pygame)",
            "Flutter (Dart)",
            "PHP (Web Backend)",
        ]
    );
}

#[test]
fn strict_policy_rejects_stray_input() {
    let a = advisor().with_policy(InputPolicy::Strict);
    assert!(a.recommend(&["P_web", "P_typo"]).is_err());
    assert!(a.recommend(&["C_js"]).is_err());
    assert_eq!(
        a.recommend_labels(&["P_web"]).unwrap(),
        ["JavaScript (Frontend/Backend)"]
    );
}

#[test]
fn indonesian_locale_lists_original_criterion_labels() {
    let a = Advisor::from_config(&AdvisorConfig {
        locale: Locale::Id,
        ..Default::default()
    })
    .unwrap();
    let labels: Vec<&str> = a.knowledge().criteria().map(|(_, e)| e.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Proyek Web",
            "Proyek Mobile",
            "Proyek Artificial Intelligence",
            "Proyek Game",
            "Proyek Sistem",
            "Mobile Cross Platform",
            "Butuh Performa Tinggi",
            "Pengalaman Pemula",
            "Pengalaman Mahir",
            "Data Science",
            "Web yang Mudah Dipelajari",
        ]
    );
    assert_eq!(
        a.recommend_labels(&["P_mobile", "P_cross"]).unwrap(),
        ["Flutter (Dart)", "Kotlin (Native Android/JVM)"]
    );
}

#[test]
fn indonesian_no_match_message() {
    let a = Advisor::from_config(&AdvisorConfig {
        locale: Locale::Id,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        a.recommend_labels::<&str>(&[]).unwrap(),
        ["Tidak ditemukan bahasa pemrograman yang cocok. Pilih kriteria lain."]
    );
}

#[test]
fn every_subset_of_criteria_satisfies_engine_properties() {
    let a = advisor();
    let criteria: Vec<FactRef> = a.knowledge().criteria().map(|(id, _)| id.into()).collect();
    let engine = InferenceEngine::new(a.rules());
    let n = criteria.len();

    for mask in 0u32..(1 << n) {
        let seeds: Vec<FactRef> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| criteria[i])
            .collect();

        let outcome = engine.run(seeds.clone());

        // Monotonic: seeds are never lost.
        assert!(seeds.iter().all(|s| outcome.facts.contains(s)));
        // Idempotent: no conclusion is proven twice.
        let unique: HashSet<_> = outcome.proven.iter().collect();
        assert_eq!(unique.len(), outcome.proven.len());
        // Total and bounded.
        assert!(outcome.passes <= a.rules().len() + 1);
        // Deterministic, independent of seed order.
        let reversed: Vec<FactRef> = seeds.iter().rev().copied().collect();
        assert_eq!(engine.run(reversed).proven, outcome.proven);
    }
}

#[test]
fn specific_rule_evaluated_before_general_rule_for_same_conclusion() {
    let a = advisor();
    let rules = a.rules().rules();
    for (i, general) in rules.iter().enumerate() {
        for specific in &rules[i + 1..] {
            let subsumes = general
                .premises()
                .iter()
                .all(|p| specific.premises().contains(p));
            if general.conclusion() == specific.conclusion() && subsumes {
                assert!(
                    specific.specificity() <= general.specificity(),
                    "{} is ordered after the less specific {}",
                    specific.name(),
                    general.name()
                );
            }
        }
    }
}

#[test]
fn concurrent_requests_share_one_advisor() {
    let a = Arc::new(advisor());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let a = Arc::clone(&a);
            std::thread::spawn(move || {
                let codes: &[&str] = if i % 2 == 0 {
                    &["P_web", "P_easy"]
                } else {
                    &["P_AI"]
                };
                (i, a.recommend_labels(codes).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (i, lines) = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(lines, ["PHP (Web Backend)", "JavaScript (Frontend/Backend)"]);
        } else {
            assert_eq!(lines, ["Python (AI/Web Backend)"]);
        }
    }
}

#[test]
fn batch_matches_sequential() {
    let a = advisor();
    let inputs: Vec<Vec<&str>> = vec![
        vec!["P_web", "P_easy"],
        vec![],
        vec!["P_game", "P_mahir"],
        vec!["P_ds", "P_AI"],
    ];
    let batch = a.recommend_batch(&inputs);
    for (input, result) in inputs.iter().zip(batch) {
        assert_eq!(result.unwrap(), a.recommend(input.as_slice()).unwrap());
    }
}

#[test]
fn bundled_catalog_round_trips_through_advisor_config() {
    let catalog = Catalog::bundled().unwrap();
    let a = Advisor::from_catalog(&catalog, &AdvisorConfig::default()).unwrap();
    assert_eq!(
        a.recommend(&["P_ds"]).unwrap(),
        Recommendation::Matches(vec!["Python (Pandas, TensorFlow)".into()])
    );
}

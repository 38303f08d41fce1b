use super::common::*;
use crate::recommendations::answers::{
    AnswerRecord, Concern, Deficiency, Goal, Lifestyle, RespiratoryIssue, StressLevel,
};
use crate::recommendations::catalog::CatalogError;
use crate::recommendations::scoring::{
    Archetype, FieldWeights, ProfileMatcher, Rule, RuleEngine, Scorer, WeightedAttributeScorer,
};

fn weighted() -> WeightedAttributeScorer {
    WeightedAttributeScorer::new(catalog(), FieldWeights::default())
}

#[test]
fn weighted_scorer_accumulates_goal_lifestyle_and_age_points() {
    let ranked = weighted().score(&energetic_senior());

    assert_eq!(
        ranked.item_ids(),
        vec![
            "vitamin-b-complex",
            "multivitamin",
            "vitamin-d3",
            "vitamin-b12",
            "coq10",
            "iron",
            "calcium",
            "omega-3",
        ]
    );
    let score = |id: &str| ranked.score_of(id).expect("item scored");
    assert!((score("vitamin-b-complex") - 5.0).abs() < 1e-9);
    assert!((score("multivitamin") - 2.8).abs() < 1e-9);
    assert!((score("omega-3") - 0.8).abs() < 1e-9);
}

#[test]
fn weighted_scorer_breaks_ties_by_catalog_order() {
    let ranked = weighted().score(&energetic_senior());

    // b12 and coq10 both total 2.0; b12 is declared first.
    assert!(ranked.position_of("vitamin-b12") < ranked.position_of("coq10"));
    assert!(ranked.position_of("iron") < ranked.position_of("calcium"));
}

#[test]
fn weighted_scorer_returns_nothing_for_empty_answers() {
    assert!(weighted().score(&AnswerRecord::default()).is_empty());
}

#[test]
fn weighted_scorer_counts_repeated_values_once() {
    let single = AnswerRecord {
        goals: vec![Goal::StressRelief],
        concerns: vec![Concern::HighStress],
        ..AnswerRecord::default()
    };
    let repeated = AnswerRecord {
        goals: vec![Goal::StressRelief, Goal::StressRelief],
        concerns: vec![Concern::HighStress, Concern::HighStress, Concern::HighStress],
        ..AnswerRecord::default()
    };

    assert_eq!(weighted().score(&single), weighted().score(&repeated));
}

#[test]
fn deficiencies_outweigh_lifestyle_hints() {
    let answers = AnswerRecord {
        lifestyle: Some(Lifestyle::ModeratelyActive),
        deficiencies: vec![Deficiency::Zinc],
        ..AnswerRecord::default()
    };

    let ranked = weighted().score(&answers);

    assert_eq!(ranked.item_ids()[0], "zinc");
    assert!((ranked.score_of("zinc").expect("zinc scored") - 6.0).abs() < 1e-9);
}

#[test]
fn profile_matcher_counts_overlapping_archetypes() {
    let matcher = ProfileMatcher::standard(catalog());
    let answers = energetic_senior();

    assert_eq!(
        matcher.matched_archetypes(&answers),
        vec!["Low Energy", "Desk Bound"]
    );

    let ranked = matcher.score(&answers);
    assert_eq!(
        ranked.item_ids(),
        vec![
            "vitamin-b-complex",
            "vitamin-d3",
            "omega-3",
            "vitamin-b12",
            "iron",
            "coq10",
        ]
    );
    assert_eq!(ranked.score_of("vitamin-b-complex"), Some(2.0));
    assert_eq!(ranked.score_of("coq10"), Some(1.0));
}

#[test]
fn profile_matcher_abstains_when_nothing_matches() {
    let matcher = ProfileMatcher::standard(catalog());
    let answers = AnswerRecord {
        age_years: Some(40),
        lifestyle: Some(Lifestyle::LightlyActive),
        ..AnswerRecord::default()
    };

    assert!(matcher.matched_archetypes(&answers).is_empty());
    assert!(matcher.score(&answers).is_empty());
}

#[test]
fn stress_level_alone_matches_stressed_professional() {
    let matcher = ProfileMatcher::standard(catalog());
    let answers = AnswerRecord {
        stress_level: Some(StressLevel::VeryHigh),
        ..AnswerRecord::default()
    };

    assert_eq!(
        matcher.matched_archetypes(&answers),
        vec!["Stressed Professional"]
    );
    assert_eq!(
        matcher.score(&answers).item_ids(),
        vec![
            "vitamin-b-complex",
            "magnesium-glycinate",
            "ashwagandha",
            "l-theanine",
        ]
    );
}

#[test]
fn rule_engine_always_starts_with_essentials() {
    let rules = RuleEngine::standard(catalog());

    let ranked = rules.score(&AnswerRecord::default());

    assert_eq!(
        ranked.item_ids(),
        vec!["vitamin-d3", "omega-3", "multivitamin"]
    );
    assert_eq!(ranked.score_of("vitamin-d3"), Some(3.0));
    assert_eq!(ranked.score_of("multivitamin"), Some(1.0));
}

#[test]
fn rule_engine_appends_fired_rules_in_declaration_order() {
    let rules = RuleEngine::standard(catalog());
    let answers = energetic_senior();

    assert_eq!(
        rules.fired_rules(&answers),
        vec!["age 50 and over", "low energy"]
    );
    assert_eq!(
        rules.score(&answers).item_ids(),
        vec![
            "vitamin-d3",
            "omega-3",
            "multivitamin",
            "vitamin-b-complex",
            "calcium",
            "coq10",
        ]
    );
}

#[test]
fn rule_engine_ignores_unrecognized_respiratory_answers() {
    let rules = RuleEngine::standard(catalog());
    let recognized = AnswerRecord {
        respiratory_issues: vec![RespiratoryIssue::Allergies],
        ..AnswerRecord::default()
    };
    let unrecognized = AnswerRecord {
        respiratory_issues: vec![RespiratoryIssue::from_label("Hiccups")],
        ..AnswerRecord::default()
    };

    assert_eq!(
        rules.score(&recognized).item_ids(),
        vec!["vitamin-d3", "omega-3", "multivitamin", "nac", "quercetin"]
    );
    assert_eq!(rules.score(&unrecognized).len(), 3);
}

fn always(_: &AnswerRecord) -> bool {
    true
}

const BROKEN_RULES: &[Rule] = &[Rule {
    name: "typo",
    items: &["magnesium-glicinate"],
    applies: always,
}];

const BROKEN_ARCHETYPES: &[Archetype] = &[Archetype {
    name: "Ghost",
    members: &["unicorn-dust"],
    matches: always,
}];

#[test]
fn validation_rejects_tables_that_reference_unknown_items() {
    let rules = RuleEngine::new(catalog(), &["vitamin-d3"], BROKEN_RULES);
    match rules.validate() {
        Err(CatalogError::UnknownItem { table, id }) => {
            assert_eq!(table, "rule items");
            assert_eq!(id, "magnesium-glicinate");
        }
        other => panic!("expected unknown item error, got {other:?}"),
    }

    let matcher = ProfileMatcher::new(catalog(), BROKEN_ARCHETYPES);
    match matcher.validate() {
        Err(CatalogError::UnknownItem { id, .. }) => assert_eq!(id, "unicorn-dust"),
        other => panic!("expected unknown item error, got {other:?}"),
    }
}

#[test]
fn standard_tables_validate_against_the_standard_catalog() {
    assert!(weighted().validate().is_ok());
    assert!(ProfileMatcher::standard(catalog()).validate().is_ok());
    assert!(RuleEngine::standard(catalog()).validate().is_ok());
}

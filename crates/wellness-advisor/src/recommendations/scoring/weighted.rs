use std::sync::Arc;

use super::super::answers::{AgeBracket, AnswerRecord, Concern, Deficiency, Goal, Lifestyle};
use super::super::catalog::{Catalog, CatalogError};
use super::{distinct, RankedList, Scorer};

type PointTable = &'static [(&'static str, f64)];

/// Multipliers applied per answer field. A stated deficiency is stronger evidence than a
/// general lifestyle category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub goals: f64,
    pub concerns: f64,
    pub deficiencies: f64,
    pub lifestyle: f64,
    pub age: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            goals: 1.0,
            concerns: 1.2,
            deficiencies: 1.5,
            lifestyle: 0.8,
            age: 1.0,
        }
    }
}

/// Accumulates points per item from independent answer fields.
pub struct WeightedAttributeScorer {
    catalog: Arc<Catalog>,
    weights: FieldWeights,
}

impl WeightedAttributeScorer {
    pub fn new(catalog: Arc<Catalog>, weights: FieldWeights) -> Self {
        Self { catalog, weights }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let ids = |table: PointTable| table.iter().map(|(id, _)| *id);

        for goal in Goal::known() {
            self.catalog.ensure_known("goal weights", ids(goal_points(&goal)))?;
        }
        for lifestyle in Lifestyle::known() {
            self.catalog
                .ensure_known("lifestyle weights", ids(lifestyle_points(&lifestyle)))?;
        }
        for concern in Concern::known() {
            self.catalog
                .ensure_known("concern weights", ids(concern_points(&concern)))?;
        }
        for deficiency in Deficiency::known() {
            self.catalog
                .ensure_known("deficiency weights", ids(deficiency_points(&deficiency)))?;
        }
        for bracket in [AgeBracket::Under30, AgeBracket::Middle, AgeBracket::FiftyPlus] {
            self.catalog
                .ensure_known("age weights", ids(age_points(bracket)))?;
        }
        Ok(())
    }

    fn apply(&self, totals: &mut [f64], table: PointTable, field_weight: f64) {
        for (id, points) in table {
            if let Some(position) = self.catalog.position(id) {
                totals[position] += points * field_weight;
            }
        }
    }
}

impl Scorer for WeightedAttributeScorer {
    fn score(&self, answers: &AnswerRecord) -> RankedList {
        let mut totals = vec![0.0; self.catalog.len()];

        for goal in distinct(&answers.goals) {
            self.apply(&mut totals, goal_points(goal), self.weights.goals);
        }
        if let Some(lifestyle) = &answers.lifestyle {
            self.apply(&mut totals, lifestyle_points(lifestyle), self.weights.lifestyle);
        }
        for concern in distinct(&answers.concerns) {
            self.apply(&mut totals, concern_points(concern), self.weights.concerns);
        }
        for deficiency in distinct(&answers.deficiencies) {
            self.apply(
                &mut totals,
                deficiency_points(deficiency),
                self.weights.deficiencies,
            );
        }
        if let Some(bracket) = answers.age_bracket() {
            self.apply(&mut totals, age_points(bracket), self.weights.age);
        }

        RankedList::from_totals(&self.catalog, &totals, |score| score > 0.0)
    }
}

fn goal_points(goal: &Goal) -> PointTable {
    match goal {
        Goal::EnergyBoost => &[
            ("vitamin-b-complex", 3.0),
            ("coq10", 2.0),
            ("vitamin-b12", 1.0),
            ("iron", 1.0),
        ],
        Goal::ImmuneSupport => &[
            ("vitamin-c", 3.0),
            ("zinc", 2.0),
            ("vitamin-d3", 2.0),
            ("quercetin", 1.0),
        ],
        Goal::BetterSleep => &[
            ("magnesium-glycinate", 3.0),
            ("melatonin", 2.0),
            ("l-theanine", 2.0),
        ],
        Goal::StressRelief => &[
            ("ashwagandha", 3.0),
            ("l-theanine", 2.0),
            ("magnesium-glycinate", 1.0),
        ],
        Goal::HeartHealth => &[
            ("omega-3", 3.0),
            ("coq10", 2.0),
            ("magnesium-glycinate", 1.0),
        ],
        Goal::CognitiveFunction => &[
            ("lions-mane", 3.0),
            ("omega-3", 2.0),
            ("vitamin-b12", 1.0),
        ],
        Goal::DigestiveHealth => &[("probiotics", 3.0)],
        Goal::JointSupport => &[
            ("turmeric-curcumin", 3.0),
            ("collagen-peptides", 2.0),
            ("omega-3", 1.0),
        ],
        Goal::SkinHealth => &[
            ("collagen-peptides", 3.0),
            ("biotin", 2.0),
            ("vitamin-c", 1.0),
        ],
        Goal::AthleticPerformance => &[
            ("magnesium-glycinate", 2.0),
            ("coq10", 1.0),
            ("iron", 1.0),
            ("omega-3", 1.0),
        ],
        Goal::WeightManagement => &[("probiotics", 1.0), ("vitamin-b-complex", 1.0)],
        Goal::HealthyAging => &[
            ("coq10", 2.0),
            ("vitamin-d3", 2.0),
            ("calcium", 1.0),
            ("collagen-peptides", 1.0),
        ],
        Goal::Unrecognized(_) => &[],
    }
}

fn lifestyle_points(lifestyle: &Lifestyle) -> PointTable {
    match lifestyle {
        Lifestyle::VeryActive => &[
            ("magnesium-glycinate", 3.0),
            ("coq10", 2.0),
            ("iron", 1.0),
        ],
        Lifestyle::ModeratelyActive => &[("magnesium-glycinate", 2.0), ("omega-3", 1.0)],
        Lifestyle::LightlyActive => &[("vitamin-d3", 1.0), ("multivitamin", 1.0)],
        Lifestyle::Sedentary => &[
            ("vitamin-d3", 2.0),
            ("omega-3", 1.0),
            ("multivitamin", 1.0),
        ],
        Lifestyle::Unrecognized(_) => &[],
    }
}

fn concern_points(concern: &Concern) -> PointTable {
    match concern {
        Concern::Fatigue => &[
            ("vitamin-b-complex", 2.0),
            ("iron", 2.0),
            ("coq10", 1.0),
        ],
        Concern::PoorSleep => &[("magnesium-glycinate", 3.0), ("melatonin", 2.0)],
        Concern::HighStress => &[("ashwagandha", 3.0), ("l-theanine", 2.0)],
        Concern::FrequentIllness => &[
            ("vitamin-c", 2.0),
            ("zinc", 2.0),
            ("vitamin-d3", 1.0),
        ],
        Concern::JointPain => &[("turmeric-curcumin", 3.0), ("omega-3", 1.0)],
        Concern::DigestiveIssues => &[("probiotics", 3.0)],
        Concern::BrainFog => &[
            ("lions-mane", 2.0),
            ("omega-3", 1.0),
            ("vitamin-b12", 1.0),
        ],
        Concern::LowMood => &[("vitamin-d3", 2.0), ("omega-3", 2.0)],
        Concern::MuscleCramps => &[("magnesium-glycinate", 3.0), ("calcium", 1.0)],
        Concern::Inflammation => &[("turmeric-curcumin", 2.0), ("omega-3", 2.0)],
        Concern::Unrecognized(_) => &[],
    }
}

fn deficiency_points(deficiency: &Deficiency) -> PointTable {
    match deficiency {
        Deficiency::VitaminD => &[("vitamin-d3", 4.0)],
        Deficiency::VitaminB12 => &[("vitamin-b12", 4.0), ("vitamin-b-complex", 1.0)],
        Deficiency::Iron => &[("iron", 4.0)],
        Deficiency::Magnesium => &[("magnesium-glycinate", 4.0)],
        Deficiency::Omega3 => &[("omega-3", 4.0)],
        Deficiency::Zinc => &[("zinc", 4.0)],
        Deficiency::Calcium => &[("calcium", 4.0), ("vitamin-d3", 1.0)],
        Deficiency::VitaminC => &[("vitamin-c", 4.0)],
        Deficiency::Unrecognized(_) => &[],
    }
}

fn age_points(bracket: AgeBracket) -> PointTable {
    match bracket {
        AgeBracket::Under30 => &[("multivitamin", 2.0), ("omega-3", 1.0)],
        AgeBracket::Middle => &[
            ("coq10", 1.0),
            ("magnesium-glycinate", 1.0),
            ("vitamin-b-complex", 1.0),
        ],
        AgeBracket::FiftyPlus => &[
            ("multivitamin", 2.0),
            ("vitamin-b-complex", 2.0),
            ("vitamin-d3", 1.0),
            ("calcium", 1.0),
            ("vitamin-b12", 1.0),
        ],
    }
}

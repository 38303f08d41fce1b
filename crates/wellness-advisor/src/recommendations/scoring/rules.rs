use std::sync::Arc;

use super::super::answers::{AnswerRecord, Concern, Deficiency, Goal, Lifestyle};
use super::super::catalog::{Catalog, CatalogError};
use super::{RankedEntry, RankedList, Scorer};

/// Recommended to everyone, whatever the answers.
pub const ESSENTIAL_ITEMS: &[&str] = &["vitamin-d3", "omega-3", "multivitamin"];

pub struct Rule {
    pub name: &'static str,
    pub items: &'static [&'static str],
    pub applies: fn(&AnswerRecord) -> bool,
}

/// Membership-only heuristic: the output order (essentials, then rules in declaration order) is
/// its whole opinion. Entry scores are `len - index` and exist for display.
pub struct RuleEngine {
    catalog: Arc<Catalog>,
    essentials: &'static [&'static str],
    rules: &'static [Rule],
}

impl RuleEngine {
    pub fn standard(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, ESSENTIAL_ITEMS, STANDARD_RULES)
    }

    pub fn new(
        catalog: Arc<Catalog>,
        essentials: &'static [&'static str],
        rules: &'static [Rule],
    ) -> Self {
        Self {
            catalog,
            essentials,
            rules,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.catalog
            .ensure_known("essential items", self.essentials.iter().copied())?;
        for rule in self.rules {
            self.catalog
                .ensure_known("rule items", rule.items.iter().copied())?;
        }
        Ok(())
    }

    pub fn fired_rules(&self, answers: &AnswerRecord) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| (rule.applies)(answers))
            .map(|rule| rule.name)
            .collect()
    }
}

impl Scorer for RuleEngine {
    fn score(&self, answers: &AnswerRecord) -> RankedList {
        let mut seen = vec![false; self.catalog.len()];
        let mut ordered = Vec::new();

        let fired = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(answers))
            .flat_map(|rule| rule.items.iter());

        for id in self.essentials.iter().chain(fired) {
            if let Some(position) = self.catalog.position(id) {
                if !seen[position] {
                    seen[position] = true;
                    ordered.push(position);
                }
            }
        }

        let len = ordered.len();
        RankedList {
            entries: ordered
                .into_iter()
                .enumerate()
                .map(|(index, position)| RankedEntry {
                    item_id: self.catalog.item_at(position).id.clone(),
                    score: (len - index) as f64,
                })
                .collect(),
        }
    }
}

const STANDARD_RULES: &[Rule] = &[
    Rule {
        name: "age 50 and over",
        items: &["vitamin-b-complex", "calcium"],
        applies: AnswerRecord::is_fifty_plus,
    },
    Rule {
        name: "low energy",
        items: &["vitamin-b-complex", "coq10"],
        applies: wants_energy,
    },
    Rule {
        name: "sleep support",
        items: &["magnesium-glycinate", "melatonin"],
        applies: needs_sleep_support,
    },
    Rule {
        name: "stress support",
        items: &["ashwagandha", "l-theanine"],
        applies: needs_stress_support,
    },
    Rule {
        name: "immune support",
        items: &["vitamin-c", "zinc"],
        applies: wants_immune_support,
    },
    Rule {
        name: "digestive support",
        items: &["probiotics"],
        applies: wants_digestive_support,
    },
    Rule {
        name: "joint and inflammation support",
        items: &["turmeric-curcumin"],
        applies: wants_joint_support,
    },
    Rule {
        name: "very active lifestyle",
        items: &["magnesium-glycinate", "coq10"],
        applies: is_very_active,
    },
    Rule {
        name: "vitamin b12 deficiency",
        items: &["vitamin-b12"],
        applies: lacks_b12,
    },
    Rule {
        name: "iron deficiency",
        items: &["iron"],
        applies: lacks_iron,
    },
    Rule {
        name: "magnesium deficiency",
        items: &["magnesium-glycinate"],
        applies: lacks_magnesium,
    },
    Rule {
        name: "zinc deficiency",
        items: &["zinc"],
        applies: lacks_zinc,
    },
    Rule {
        name: "calcium deficiency",
        items: &["calcium"],
        applies: lacks_calcium,
    },
    Rule {
        name: "vitamin c deficiency",
        items: &["vitamin-c"],
        applies: lacks_vitamin_c,
    },
    Rule {
        name: "cognitive support",
        items: &["lions-mane"],
        applies: wants_cognitive_support,
    },
    Rule {
        name: "skin support",
        items: &["collagen-peptides", "biotin"],
        applies: wants_skin_support,
    },
    Rule {
        name: "respiratory support",
        items: &["nac", "quercetin"],
        applies: AnswerRecord::has_respiratory_issues,
    },
];

fn wants_energy(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::EnergyBoost) || answers.has_concern(&Concern::Fatigue)
}

fn needs_sleep_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::BetterSleep)
        || answers.has_concern(&Concern::PoorSleep)
        || answers.sleep_is_poor()
}

fn needs_stress_support(answers: &AnswerRecord) -> bool {
    answers.stress_is_high() || answers.has_concern(&Concern::HighStress)
}

fn wants_immune_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::ImmuneSupport) || answers.has_concern(&Concern::FrequentIllness)
}

fn wants_digestive_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::DigestiveHealth) || answers.has_concern(&Concern::DigestiveIssues)
}

fn wants_joint_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::JointSupport)
        || answers.has_concern(&Concern::JointPain)
        || answers.has_concern(&Concern::Inflammation)
}

fn is_very_active(answers: &AnswerRecord) -> bool {
    answers.lifestyle_is(&Lifestyle::VeryActive)
}

fn lacks_b12(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::VitaminB12)
}

fn lacks_iron(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::Iron)
}

fn lacks_magnesium(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::Magnesium)
}

fn lacks_zinc(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::Zinc)
}

fn lacks_calcium(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::Calcium)
}

fn lacks_vitamin_c(answers: &AnswerRecord) -> bool {
    answers.has_deficiency(&Deficiency::VitaminC)
}

fn wants_cognitive_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::CognitiveFunction) || answers.has_cognitive_goals()
}

fn wants_skin_support(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::SkinHealth) || answers.has_skin_concerns()
}

use std::sync::Arc;

use super::super::answers::{AnswerRecord, Concern, Goal, Lifestyle, RespiratoryIssue};
use super::super::catalog::{Catalog, CatalogError};
use super::{RankedList, Scorer};

/// Named bundle of items offered to anyone whose answers fit the predicate.
pub struct Archetype {
    pub name: &'static str,
    pub members: &'static [&'static str],
    pub matches: fn(&AnswerRecord) -> bool,
}

/// Counts, per item, how many matched archetypes include it.
pub struct ProfileMatcher {
    catalog: Arc<Catalog>,
    archetypes: &'static [Archetype],
}

impl ProfileMatcher {
    pub fn standard(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, STANDARD_ARCHETYPES)
    }

    pub fn new(catalog: Arc<Catalog>, archetypes: &'static [Archetype]) -> Self {
        Self {
            catalog,
            archetypes,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for archetype in self.archetypes {
            self.catalog
                .ensure_known("archetype members", archetype.members.iter().copied())?;
        }
        Ok(())
    }

    pub fn matched_archetypes(&self, answers: &AnswerRecord) -> Vec<&'static str> {
        self.archetypes
            .iter()
            .filter(|archetype| (archetype.matches)(answers))
            .map(|archetype| archetype.name)
            .collect()
    }
}

impl Scorer for ProfileMatcher {
    fn score(&self, answers: &AnswerRecord) -> RankedList {
        let mut counts = vec![0.0; self.catalog.len()];
        let mut matched = 0usize;

        for archetype in self.archetypes {
            if !(archetype.matches)(answers) {
                continue;
            }
            matched += 1;
            for member in archetype.members {
                if let Some(position) = self.catalog.position(member) {
                    counts[position] += 1.0;
                }
            }
        }

        // No archetype fits: abstain rather than guess.
        if matched == 0 {
            return RankedList::default();
        }

        RankedList::from_totals(&self.catalog, &counts, |count| count > 0.0)
    }
}

const STANDARD_ARCHETYPES: &[Archetype] = &[
    Archetype {
        name: "Stressed Professional",
        members: &[
            "ashwagandha",
            "l-theanine",
            "magnesium-glycinate",
            "vitamin-b-complex",
        ],
        matches: stressed_professional,
    },
    Archetype {
        name: "Restless Sleeper",
        members: &["magnesium-glycinate", "melatonin", "l-theanine"],
        matches: restless_sleeper,
    },
    Archetype {
        name: "Active Athlete",
        members: &["magnesium-glycinate", "coq10", "omega-3", "iron"],
        matches: active_athlete,
    },
    Archetype {
        name: "Low Energy",
        members: &["vitamin-b-complex", "iron", "coq10", "vitamin-b12"],
        matches: low_energy,
    },
    Archetype {
        name: "Immune Seeker",
        members: &["vitamin-c", "zinc", "vitamin-d3", "quercetin"],
        matches: immune_seeker,
    },
    Archetype {
        name: "Cognitive Optimizer",
        members: &["lions-mane", "omega-3", "vitamin-b12"],
        matches: cognitive_optimizer,
    },
    Archetype {
        name: "Graceful Ager",
        members: &[
            "coq10",
            "collagen-peptides",
            "turmeric-curcumin",
            "calcium",
        ],
        matches: graceful_ager,
    },
    Archetype {
        name: "Skin & Beauty",
        members: &["collagen-peptides", "biotin", "vitamin-c"],
        matches: skin_and_beauty,
    },
    Archetype {
        name: "Gut Health",
        members: &["probiotics"],
        matches: gut_health,
    },
    Archetype {
        name: "Desk Bound",
        members: &["vitamin-d3", "omega-3", "vitamin-b-complex"],
        matches: desk_bound,
    },
];

fn stressed_professional(answers: &AnswerRecord) -> bool {
    answers.stress_is_high()
        || answers.has_goal(&Goal::StressRelief)
        || answers.has_concern(&Concern::HighStress)
}

fn restless_sleeper(answers: &AnswerRecord) -> bool {
    answers.sleep_is_poor()
        || answers.has_goal(&Goal::BetterSleep)
        || answers.has_concern(&Concern::PoorSleep)
}

fn active_athlete(answers: &AnswerRecord) -> bool {
    answers.lifestyle_is(&Lifestyle::VeryActive)
        || (answers.lifestyle_is(&Lifestyle::ModeratelyActive)
            && answers.has_goal(&Goal::AthleticPerformance))
}

fn low_energy(answers: &AnswerRecord) -> bool {
    answers.energy_is_low()
        || answers.has_goal(&Goal::EnergyBoost)
        || answers.has_concern(&Concern::Fatigue)
}

fn immune_seeker(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::ImmuneSupport)
        || answers.has_concern(&Concern::FrequentIllness)
        || answers
            .respiratory_issues
            .contains(&RespiratoryIssue::FrequentColds)
}

fn cognitive_optimizer(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::CognitiveFunction)
        || answers.has_cognitive_goals()
        || answers.has_concern(&Concern::BrainFog)
}

fn graceful_ager(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::HealthyAging)
        || answers.has_goal(&Goal::JointSupport)
        || answers.has_concern(&Concern::JointPain)
}

fn skin_and_beauty(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::SkinHealth) || answers.has_skin_concerns()
}

fn gut_health(answers: &AnswerRecord) -> bool {
    answers.has_goal(&Goal::DigestiveHealth) || answers.has_concern(&Concern::DigestiveIssues)
}

fn desk_bound(answers: &AnswerRecord) -> bool {
    answers.lifestyle_is(&Lifestyle::Sedentary)
}

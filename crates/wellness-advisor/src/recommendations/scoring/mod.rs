mod archetypes;
mod ensemble;
mod rules;
mod weighted;

pub use archetypes::{Archetype, ProfileMatcher};
pub use ensemble::EnsembleCombiner;
pub use rules::{Rule, RuleEngine, ESSENTIAL_ITEMS};
pub use weighted::{FieldWeights, WeightedAttributeScorer};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::answers::AnswerRecord;
use super::catalog::{Catalog, CatalogError, ItemId};
use crate::config::RecommendationConfig;

/// One heuristic's opinion about an answer record.
pub trait Scorer: Send + Sync {
    fn score(&self, answers: &AnswerRecord) -> RankedList;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub item_id: ItemId,
    pub score: f64,
}

/// Items in descending order of preference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    pub entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.item_id.as_str())
            .collect()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.item_id.as_str() == id)
    }

    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.item_id.as_str() == id)
            .map(|entry| entry.score)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Builds a ranking from per-catalog-position totals. Entries rejected by `keep` are dropped;
    /// ties keep catalog order because the sort is stable over ascending positions.
    pub(crate) fn from_totals<F>(catalog: &Catalog, totals: &[f64], keep: F) -> Self
    where
        F: Fn(f64) -> bool,
    {
        let mut ranked: Vec<(usize, f64)> = totals
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, score)| keep(*score))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self {
            entries: ranked
                .into_iter()
                .map(|(position, score)| RankedEntry {
                    item_id: catalog.item_at(position).id.clone(),
                    score,
                })
                .collect(),
        }
    }
}

/// Yields each distinct value once, in first-seen order.
pub(crate) fn distinct<T: PartialEq>(values: &[T]) -> impl Iterator<Item = &T> {
    values
        .iter()
        .enumerate()
        .filter(|(index, value)| !values[..*index].contains(value))
        .map(|(_, value)| value)
}

/// A scorer together with the weight the combiner gives its ranking.
pub struct ScorerSlot {
    pub label: &'static str,
    pub weight: f64,
    pub scorer: Arc<dyn Scorer>,
}

/// One heuristic's ranking as it fed into the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicRanking {
    pub label: String,
    pub weight: f64,
    pub ranked: RankedList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub ranked: RankedList,
    pub matched_archetypes: Vec<String>,
    pub heuristics: Vec<HeuristicRanking>,
}

/// Runs every configured scorer against an answer record and merges their rankings.
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    slots: Vec<ScorerSlot>,
    matcher: Option<Arc<ProfileMatcher>>,
    combiner: EnsembleCombiner,
}

impl RecommendationEngine {
    /// Builds the three reference heuristics. Every table is checked against the catalog so a
    /// mistyped item id fails here rather than silently scoring nothing.
    pub fn standard(
        catalog: Arc<Catalog>,
        config: &RecommendationConfig,
    ) -> Result<Self, CatalogError> {
        let weighted = WeightedAttributeScorer::new(catalog.clone(), FieldWeights::default());
        weighted.validate()?;
        let matcher = Arc::new(ProfileMatcher::standard(catalog.clone()));
        matcher.validate()?;
        let rules = RuleEngine::standard(catalog.clone());
        rules.validate()?;

        let slots = vec![
            ScorerSlot {
                label: "weighted_attribute",
                weight: config.weights.weighted_attribute,
                scorer: Arc::new(weighted),
            },
            ScorerSlot {
                label: "profile_match",
                weight: config.weights.profile_match,
                scorer: matcher.clone(),
            },
            ScorerSlot {
                label: "rule_engine",
                weight: config.weights.rule_engine,
                scorer: Arc::new(rules),
            },
        ];

        let mut engine = Self::with_scorers(catalog, slots, config.top_n);
        engine.matcher = Some(matcher);
        Ok(engine)
    }

    pub fn with_scorers(catalog: Arc<Catalog>, slots: Vec<ScorerSlot>, top_n: usize) -> Self {
        let combiner = EnsembleCombiner::new(catalog.clone(), top_n);
        Self {
            catalog,
            slots,
            matcher: None,
            combiner,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn rank(&self, answers: &AnswerRecord) -> EngineOutput {
        let heuristics: Vec<HeuristicRanking> = self
            .slots
            .iter()
            .map(|slot| {
                let ranked = slot.scorer.score(answers);
                debug!(heuristic = slot.label, items = ranked.len(), "heuristic ranked");
                HeuristicRanking {
                    label: slot.label.to_string(),
                    weight: slot.weight,
                    ranked,
                }
            })
            .collect();

        let weighted: Vec<(RankedList, f64)> = heuristics
            .iter()
            .map(|heuristic| (heuristic.ranked.clone(), heuristic.weight))
            .collect();
        let ranked = self.combiner.combine(&weighted);

        let matched_archetypes = self
            .matcher
            .as_ref()
            .map(|matcher| {
                matcher
                    .matched_archetypes(answers)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        EngineOutput {
            ranked,
            matched_archetypes,
            heuristics,
        }
    }
}

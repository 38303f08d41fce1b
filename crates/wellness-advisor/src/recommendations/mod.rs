//! Supplement recommendations: questionnaire answers are scored by three independent heuristics,
//! merged into one ranking, and recorded against the user's profile.

pub mod answers;
pub mod catalog;
pub mod profile;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod tracking;

#[cfg(test)]
mod tests;

pub use answers::{
    AgeBracket, AnswerError, AnswerRecord, CognitiveGoal, Concern, Deficiency, EnergyLevel, Goal,
    Lifestyle, RespiratoryIssue, SkinConcern, SleepQuality, StressLevel,
};
pub use catalog::{Catalog, CatalogError, Category, Item, ItemId};
pub use profile::{
    derive_insights, AssessmentHistoryEntry, ProfileInsights, ProfileStore, ProfileUpdate,
    StoreError, UserId, UserProfile,
};
pub use router::{recommendation_router, IntakeRequest};
pub use scoring::{
    EngineOutput, EnsembleCombiner, HeuristicRanking, ProfileMatcher, RankedEntry, RankedList,
    RecommendationEngine, RuleEngine, Scorer, ScorerSlot, WeightedAttributeScorer,
    ESSENTIAL_ITEMS,
};
pub use service::{
    RecommendationError, RecommendationOutcome, RecommendationService, RecommendedItem,
};
pub use store::{InMemoryProfileStore, JsonFileProfileStore};
pub use tracking::{compliance_score, IntakeEvent, IntakeReport, IntakeTracker, TrackingError};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::answers::{AnswerError, AnswerRecord};
use super::catalog::{Catalog, CatalogError, Item};
use super::profile::{
    derive_insights, AssessmentHistoryEntry, ProfileStore, StoreError, UserId, UserProfile,
};
use super::scoring::RecommendationEngine;
use crate::config::RecommendationConfig;

/// An item in the final ranking, flagged for this call only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub item: Item,
    pub score: f64,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub user_id: UserId,
    pub recommendations: Vec<RecommendedItem>,
    pub matched_archetypes: Vec<String>,
    /// Non-fatal store failures. The ranking is valid even when this is non-empty.
    pub warnings: Vec<String>,
}

impl RecommendationOutcome {
    pub fn item_ids(&self) -> Vec<&str> {
        self.recommendations
            .iter()
            .map(|recommended| recommended.item.id.as_str())
            .collect()
    }
}

/// Runs the ranking pipeline and records its result against the user's profile.
pub struct RecommendationService<S> {
    engine: Arc<RecommendationEngine>,
    store: Arc<S>,
    max_age_years: u16,
}

impl<S> RecommendationService<S>
where
    S: ProfileStore + 'static,
{
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<S>,
        config: &RecommendationConfig,
    ) -> Result<Self, CatalogError> {
        let engine = RecommendationEngine::standard(catalog, config)?;
        Ok(Self::with_engine(Arc::new(engine), store, config.max_age_years))
    }

    pub fn with_engine(
        engine: Arc<RecommendationEngine>,
        store: Arc<S>,
        max_age_years: u16,
    ) -> Self {
        Self {
            engine,
            store,
            max_age_years,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn recommend(
        &self,
        user_id: &UserId,
        answers: AnswerRecord,
    ) -> Result<RecommendationOutcome, RecommendationError> {
        self.recommend_at(user_id, answers, Utc::now())
    }

    /// Same as [`recommend`](Self::recommend) with an explicit history timestamp.
    pub fn recommend_at(
        &self,
        user_id: &UserId,
        answers: AnswerRecord,
        timestamp: DateTime<Utc>,
    ) -> Result<RecommendationOutcome, RecommendationError> {
        answers.validate(self.max_age_years)?;

        let output = self.engine.rank(&answers);
        let catalog = self.engine.catalog();
        let recommendations: Vec<RecommendedItem> = output
            .ranked
            .entries
            .iter()
            .filter_map(|entry| {
                catalog.get(entry.item_id.as_str()).map(|item| RecommendedItem {
                    item: item.clone(),
                    score: entry.score,
                    recommended: true,
                })
            })
            .collect();

        let mut warnings = Vec::new();

        let insights = derive_insights(&answers);
        if let Err(err) = self.store.upsert_profile(user_id, insights.into()) {
            warn!(user = %user_id, error = %err, "profile upsert failed");
            warnings.push(format!("profile update failed: {err}"));
        }

        let entry = AssessmentHistoryEntry {
            timestamp,
            answers,
            recommended_item_ids: output
                .ranked
                .entries
                .iter()
                .map(|entry| entry.item_id.clone())
                .collect(),
            compliance_score: 0,
        };
        if let Err(err) = self.store.append_history(user_id, entry) {
            warn!(user = %user_id, error = %err, "assessment history append failed");
            warnings.push(format!("assessment history not saved: {err}"));
        }

        info!(
            user = %user_id,
            recommended = recommendations.len(),
            warnings = warnings.len(),
            "assessment scored"
        );

        Ok(RecommendationOutcome {
            user_id: user_id.clone(),
            recommendations,
            matched_archetypes: output.matched_archetypes,
            warnings,
        })
    }

    pub fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.store.get_profile(user_id)
    }

    pub fn history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        self.store.get_history(user_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("invalid answers: {0}")]
    InvalidAnswers(#[from] AnswerError),
}

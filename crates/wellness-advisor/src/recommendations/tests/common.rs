use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::RecommendationConfig;
use crate::recommendations::answers::{AnswerRecord, Concern, Deficiency, Goal, Lifestyle};
use crate::recommendations::profile::{
    AssessmentHistoryEntry, ProfileStore, ProfileUpdate, StoreError, UserId, UserProfile,
};
use crate::recommendations::{
    recommendation_router, Catalog, InMemoryProfileStore, RecommendationEngine,
    RecommendationService,
};

pub(super) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::standard().expect("standard catalog"))
}

pub(super) fn recommendation_config() -> RecommendationConfig {
    RecommendationConfig::default()
}

pub(super) fn engine() -> RecommendationEngine {
    RecommendationEngine::standard(catalog(), &recommendation_config()).expect("standard engine")
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn assessed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn build_service() -> (
    RecommendationService<InMemoryProfileStore>,
    Arc<InMemoryProfileStore>,
) {
    let store = Arc::new(InMemoryProfileStore::default());
    let service = RecommendationService::new(catalog(), store.clone(), &recommendation_config())
        .expect("service builds");
    (service, store)
}

/// Age 55, wants energy, sits all day.
pub(super) fn energetic_senior() -> AnswerRecord {
    AnswerRecord {
        age_years: Some(55),
        goals: vec![Goal::EnergyBoost],
        lifestyle: Some(Lifestyle::Sedentary),
        ..AnswerRecord::default()
    }
}

pub(super) fn restless_sleeper() -> AnswerRecord {
    AnswerRecord {
        goals: vec![Goal::BetterSleep],
        concerns: vec![Concern::PoorSleep],
        ..AnswerRecord::default()
    }
}

pub(super) fn immune_focused() -> AnswerRecord {
    AnswerRecord {
        age_years: Some(34),
        goals: vec![Goal::ImmuneSupport, Goal::HeartHealth],
        lifestyle: Some(Lifestyle::ModeratelyActive),
        concerns: vec![Concern::FrequentIllness, Concern::Fatigue],
        deficiencies: vec![Deficiency::VitaminD],
        ..AnswerRecord::default()
    }
}

pub(super) struct UnavailableStore;

impl ProfileStore for UnavailableStore {
    fn upsert_profile(
        &self,
        _user_id: &UserId,
        _update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append_history(
        &self,
        _user_id: &UserId,
        _entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get_profile(&self, _user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get_history(&self, _user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_latest_compliance(&self, _user_id: &UserId, _score: u8) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Accepts profile writes but refuses history appends.
#[derive(Default)]
pub(super) struct HistoryRejectingStore {
    pub(super) inner: InMemoryProfileStore,
}

impl ProfileStore for HistoryRejectingStore {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        self.inner.upsert_profile(user_id, update)
    }

    fn append_history(
        &self,
        _user_id: &UserId,
        _entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("history table locked".to_string()))
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.inner.get_profile(user_id)
    }

    fn get_history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        self.inner.get_history(user_id)
    }

    fn set_latest_compliance(&self, user_id: &UserId, score: u8) -> Result<(), StoreError> {
        self.inner.set_latest_compliance(user_id, score)
    }
}

pub(super) fn router_with_service(
    service: RecommendationService<InMemoryProfileStore>,
) -> axum::Router {
    recommendation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

static SCRATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Fresh path under the system temp dir; the file itself is not created.
pub(super) fn scratch_store_path(label: &str) -> PathBuf {
    let sequence = SCRATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let directory = std::env::temp_dir().join(format!(
        "wellness-advisor-{label}-{}-{sequence}",
        std::process::id()
    ));
    directory.join("profiles.json")
}

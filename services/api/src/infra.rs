use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use wellness_advisor::config::{RecommendationConfig, StorageConfig};
use wellness_advisor::error::AppError;
use wellness_advisor::recommendations::{
    AssessmentHistoryEntry, Catalog, InMemoryProfileStore, JsonFileProfileStore, ProfileStore,
    ProfileUpdate, RecommendationService, StoreError, UserId, UserProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Profile store chosen at startup from `APP_PROFILE_STORE` or `--store`.
pub(crate) enum ProfileBackend {
    Memory(InMemoryProfileStore),
    JsonFile(JsonFileProfileStore),
}

impl ProfileBackend {
    pub(crate) fn from_storage(storage: &StorageConfig) -> Self {
        match &storage.profile_store {
            Some(path) => {
                info!(path = %path.display(), "using json profile store");
                Self::JsonFile(JsonFileProfileStore::new(path.clone()))
            }
            None => {
                info!("using in-memory profile store");
                Self::Memory(InMemoryProfileStore::default())
            }
        }
    }

    fn inner(&self) -> &dyn ProfileStore {
        match self {
            Self::Memory(store) => store,
            Self::JsonFile(store) => store,
        }
    }
}

impl ProfileStore for ProfileBackend {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        self.inner().upsert_profile(user_id, update)
    }

    fn append_history(
        &self,
        user_id: &UserId,
        entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError> {
        self.inner().append_history(user_id, entry)
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.inner().get_profile(user_id)
    }

    fn get_history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        self.inner().get_history(user_id)
    }

    fn set_latest_compliance(&self, user_id: &UserId, score: u8) -> Result<(), StoreError> {
        self.inner().set_latest_compliance(user_id, score)
    }
}

/// Builds the service against the standard catalog, validating every scoring table first.
pub(crate) fn build_service(
    storage: &StorageConfig,
    recommendation: &RecommendationConfig,
) -> Result<Arc<RecommendationService<ProfileBackend>>, AppError> {
    let catalog = Arc::new(Catalog::standard()?);
    let store = Arc::new(ProfileBackend::from_storage(storage));
    let service = RecommendationService::new(catalog, store, recommendation)?;
    Ok(Arc::new(service))
}

pub(crate) fn storage_with_override(
    storage: &StorageConfig,
    store: Option<PathBuf>,
) -> StorageConfig {
    StorageConfig {
        profile_store: store.or_else(|| storage.profile_store.clone()),
    }
}

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::profile::{
    AssessmentHistoryEntry, ProfileStore, ProfileUpdate, StoreError, UserId, UserProfile,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("profile store lock poisoned".to_string()))
}

/// Process-local store used by tests and the default server wiring.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        let mut guard = lock(&self.profiles)?;
        let profile = guard
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()));
        profile.apply(update);
        Ok(profile.clone())
    }

    fn append_history(
        &self,
        user_id: &UserId,
        entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError> {
        let mut guard = lock(&self.profiles)?;
        guard
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()))
            .assessment_history
            .push(entry);
        Ok(())
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let guard = lock(&self.profiles)?;
        Ok(guard.get(user_id).cloned())
    }

    fn get_history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        let guard = lock(&self.profiles)?;
        Ok(guard
            .get(user_id)
            .map(|profile| profile.assessment_history.clone())
            .unwrap_or_default())
    }

    fn set_latest_compliance(&self, user_id: &UserId, score: u8) -> Result<(), StoreError> {
        let mut guard = lock(&self.profiles)?;
        let profile = guard.get_mut(user_id).ok_or(StoreError::NotFound)?;
        set_compliance(profile, score);
        Ok(())
    }
}

fn set_compliance(profile: &mut UserProfile, score: u8) {
    let score = score.min(100);
    profile.compliance_score = score;
    if let Some(latest) = profile.assessment_history.last_mut() {
        latest.compliance_score = score;
    }
}

/// Keeps every profile in one JSON document. Each write lands in a sibling temp file that is
/// renamed over the original, so readers never observe a half-written document.
pub struct JsonFileProfileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<UserId, UserProfile>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => {
                let profiles: Vec<UserProfile> = serde_json::from_slice(&bytes)?;
                Ok(profiles
                    .into_iter()
                    .map(|profile| (profile.user_id.clone(), profile))
                    .collect())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn persist(&self, profiles: &BTreeMap<UserId, UserProfile>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document: Vec<&UserProfile> = profiles.values().collect();
        let bytes = serde_json::to_vec_pretty(&document)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), profiles = profiles.len(), "profile store persisted");
        Ok(())
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut BTreeMap<UserId, UserProfile>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = lock(&self.lock)?;
        let mut profiles = self.load()?;
        let value = change(&mut profiles)?;
        self.persist(&profiles)?;
        Ok(value)
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        self.modify(|profiles| {
            let profile = profiles
                .entry(user_id.clone())
                .or_insert_with(|| UserProfile::new(user_id.clone()));
            profile.apply(update);
            Ok(profile.clone())
        })
    }

    fn append_history(
        &self,
        user_id: &UserId,
        entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError> {
        self.modify(|profiles| {
            profiles
                .entry(user_id.clone())
                .or_insert_with(|| UserProfile::new(user_id.clone()))
                .assessment_history
                .push(entry);
            Ok(())
        })
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let _guard = lock(&self.lock)?;
        Ok(self.load()?.remove(user_id))
    }

    fn get_history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError> {
        let _guard = lock(&self.lock)?;
        Ok(self
            .load()?
            .remove(user_id)
            .map(|profile| profile.assessment_history)
            .unwrap_or_default())
    }

    fn set_latest_compliance(&self, user_id: &UserId, score: u8) -> Result<(), StoreError> {
        self.modify(|profiles| {
            let profile = profiles.get_mut(user_id).ok_or(StoreError::NotFound)?;
            set_compliance(profile, score);
            Ok(())
        })
    }
}

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers::{AnswerRecord, Concern, Deficiency};
use super::catalog::ItemId;

/// Identifier wrapper for the person taking assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Archived result of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub answers: AnswerRecord,
    pub recommended_item_ids: Vec<ItemId>,
    /// 0-100, starts at 0 and is raised by intake tracking.
    pub compliance_score: u8,
}

/// Durable per-user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub deficiencies: BTreeSet<String>,
    pub strengths: BTreeSet<String>,
    pub compliance_score: u8,
    pub assessment_history: Vec<AssessmentHistoryEntry>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            deficiencies: BTreeSet::new(),
            strengths: BTreeSet::new(),
            compliance_score: 0,
            assessment_history: Vec::new(),
        }
    }

    pub fn latest_assessment(&self) -> Option<&AssessmentHistoryEntry> {
        self.assessment_history.last()
    }

    pub(crate) fn apply(&mut self, update: ProfileUpdate) {
        if let Some(deficiencies) = update.deficiencies {
            self.deficiencies = deficiencies;
        }
        if let Some(strengths) = update.strengths {
            self.strengths = strengths;
        }
        if let Some(score) = update.compliance_score {
            self.compliance_score = score.min(100);
        }
    }
}

/// Partial profile write. Present fields replace the stored value, absent ones are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub deficiencies: Option<BTreeSet<String>>,
    pub strengths: Option<BTreeSet<String>>,
    pub compliance_score: Option<u8>,
}

impl From<ProfileInsights> for ProfileUpdate {
    fn from(insights: ProfileInsights) -> Self {
        Self {
            deficiencies: Some(insights.deficiencies),
            strengths: Some(insights.strengths),
            compliance_score: None,
        }
    }
}

/// Storage port for profiles and assessment history. Writes are last-write-wins per user.
pub trait ProfileStore: Send + Sync {
    /// Creates the profile when missing, then applies `update`.
    fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, StoreError>;
    fn append_history(
        &self,
        user_id: &UserId,
        entry: AssessmentHistoryEntry,
    ) -> Result<(), StoreError>;
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;
    /// Oldest first; empty for unknown users.
    fn get_history(&self, user_id: &UserId) -> Result<Vec<AssessmentHistoryEntry>, StoreError>;
    /// Writes `score` to the profile and to its most recent history entry.
    fn set_latest_compliance(&self, user_id: &UserId, score: u8) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
    #[error("profile store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile store document is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Deficiency and strength summary derived from one answer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInsights {
    pub deficiencies: BTreeSet<String>,
    pub strengths: BTreeSet<String>,
}

/// Stated deficiencies are copied, concerns add the deficiencies they usually point to, and
/// goals become strengths. Unrecognized values are skipped.
pub fn derive_insights(answers: &AnswerRecord) -> ProfileInsights {
    let mut deficiencies: BTreeSet<String> = answers
        .deficiencies
        .iter()
        .filter(|deficiency| deficiency.is_recognized())
        .map(|deficiency| deficiency.label().to_string())
        .collect();

    for concern in &answers.concerns {
        for inferred in inferred_deficiencies(concern) {
            deficiencies.insert(inferred.label().to_string());
        }
    }

    let strengths = answers
        .goals
        .iter()
        .filter(|goal| goal.is_recognized())
        .map(|goal| goal.label().to_string())
        .collect();

    ProfileInsights {
        deficiencies,
        strengths,
    }
}

fn inferred_deficiencies(concern: &Concern) -> Vec<Deficiency> {
    match concern {
        Concern::PoorSleep => vec![Deficiency::Magnesium],
        Concern::Fatigue => vec![Deficiency::Iron, Deficiency::VitaminB12],
        Concern::MuscleCramps => vec![Deficiency::Magnesium, Deficiency::Calcium],
        Concern::FrequentIllness => vec![
            Deficiency::VitaminC,
            Deficiency::Zinc,
            Deficiency::VitaminD,
        ],
        Concern::LowMood => vec![Deficiency::VitaminD, Deficiency::Omega3],
        Concern::BrainFog => vec![Deficiency::VitaminB12, Deficiency::Omega3],
        Concern::HighStress
        | Concern::JointPain
        | Concern::DigestiveIssues
        | Concern::Inflammation
        | Concern::Unrecognized(_) => Vec::new(),
    }
}

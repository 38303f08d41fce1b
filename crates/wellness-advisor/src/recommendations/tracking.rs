use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::ItemId;
use super::profile::{ProfileStore, StoreError, UserId};

/// One logged dose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeEvent {
    pub item_id: ItemId,
    pub taken_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeReport {
    pub user_id: UserId,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub doses_taken: usize,
    pub doses_expected: usize,
    pub compliance_score: u8,
}

/// Percentage of expected daily doses taken inside `from..=to`.
///
/// Each recommended item is expected once per day. Repeated logs for the same item and day count
/// once, and items outside `recommended` are ignored.
pub fn compliance_score(
    recommended: &[ItemId],
    events: &[IntakeEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> u8 {
    let (taken, expected) = dose_counts(recommended, events, from, to);
    if expected == 0 {
        return 0;
    }
    let percent = (taken as f64 / expected as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

fn dose_counts(
    recommended: &[ItemId],
    events: &[IntakeEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> (usize, usize) {
    if to < from {
        return (0, 0);
    }
    let items: BTreeSet<&ItemId> = recommended.iter().collect();
    let days = (to - from).num_days() as usize + 1;

    let taken: BTreeSet<(&ItemId, NaiveDate)> = events
        .iter()
        .filter(|event| items.contains(&event.item_id))
        .filter(|event| event.taken_on >= from && event.taken_on <= to)
        .map(|event| (&event.item_id, event.taken_on))
        .collect();

    (taken.len(), items.len() * days)
}

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("user {0} has no completed assessment")]
    NoAssessment(UserId),
    #[error("intake window ends on {today}, before the latest assessment on {assessed_on}")]
    WindowBeforeAssessment {
        today: NaiveDate,
        assessed_on: NaiveDate,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Replays intake logs against the latest assessment and stores the resulting score.
pub struct IntakeTracker<S> {
    store: Arc<S>,
}

impl<S> IntakeTracker<S>
where
    S: ProfileStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn record(
        &self,
        user_id: &UserId,
        events: &[IntakeEvent],
        today: NaiveDate,
    ) -> Result<IntakeReport, TrackingError> {
        let profile = self
            .store
            .get_profile(user_id)?
            .ok_or_else(|| TrackingError::NoAssessment(user_id.clone()))?;
        let latest = profile
            .latest_assessment()
            .ok_or_else(|| TrackingError::NoAssessment(user_id.clone()))?;

        let window_start = latest.timestamp.date_naive();
        if today < window_start {
            return Err(TrackingError::WindowBeforeAssessment {
                today,
                assessed_on: window_start,
            });
        }
        let recommended = &latest.recommended_item_ids;
        let (doses_taken, doses_expected) = dose_counts(recommended, events, window_start, today);
        let score = compliance_score(recommended, events, window_start, today);

        self.store.set_latest_compliance(user_id, score)?;
        info!(user = %user_id, score, doses_taken, doses_expected, "intake recorded");

        Ok(IntakeReport {
            user_id: user_id.clone(),
            window_start,
            window_end: today,
            doses_taken,
            doses_expected,
            compliance_score: score,
        })
    }
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use quest_core::model::{ProgressId, ProgressRecord, SkillName, Subject};
use quest_core::Clock;

use crate::repository::{ContentError, ProgressRow, ProgressStore, SeedError};

const PROGRESS_JSON: &str = include_str!("data/progress.json");

/// Simulated latency for progress reads/writes, matching the original
/// mock service.
pub const PROGRESS_LATENCY: Duration = Duration::from_millis(200);

/// Single-owner, in-memory progress store.
///
/// Holds the one aggregate record shared across sessions. Updates are
/// read-modify-write under a mutex; a single child plays one session at a
/// time, so there is no concurrent-writer protocol beyond that.
#[derive(Clone)]
pub struct InMemoryProgressStore {
    record: Arc<Mutex<ProgressRecord>>,
    clock: Clock,
    latency: Duration,
}

impl InMemoryProgressStore {
    /// Create a store around an existing record.
    #[must_use]
    pub fn new(record: ProgressRecord, clock: Clock) -> Self {
        Self {
            record: Arc::new(Mutex::new(record)),
            clock,
            latency: PROGRESS_LATENCY,
        }
    }

    /// Create a store with a fresh, empty record.
    #[must_use]
    pub fn empty(clock: Clock) -> Self {
        Self::new(ProgressRecord::new(ProgressId::new(1), clock.now()), clock)
    }

    /// Load the seeded progress record shipped with the app.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the embedded JSON is malformed.
    pub fn from_embedded(clock: Clock) -> Result<Self, SeedError> {
        let row: ProgressRow = serde_json::from_str(PROGRESS_JSON)?;
        Ok(Self::new(row.into_record()?, clock))
    }

    /// Override the simulated latency (zero for tests).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn update<F>(&self, apply: F) -> Result<ProgressRecord, ContentError>
    where
        F: FnOnce(&mut ProgressRecord) -> Result<(), ContentError>,
    {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| ContentError::Unavailable(e.to_string()))?;
        apply(&mut guard)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn current(&self) -> Result<ProgressRecord, ContentError> {
        self.simulate_latency().await;
        let guard = self
            .record
            .lock()
            .map_err(|e| ContentError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn add_stars(&self, amount: u32) -> Result<ProgressRecord, ContentError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        let updated = self.update(|record| {
            record
                .add_stars(amount, now)
                .map_err(|e| ContentError::Invalid(e.to_string()))
        })?;
        debug!(amount, total = updated.total_stars(), "stars awarded");
        Ok(updated)
    }

    async fn set_level(&self, subject: Subject, level: u32) -> Result<ProgressRecord, ContentError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        self.update(|record| {
            record
                .set_level(subject, level, now)
                .map_err(|e| ContentError::Invalid(e.to_string()))
        })
    }

    async fn add_mastered_skill(&self, skill: SkillName) -> Result<ProgressRecord, ContentError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        self.update(|record| {
            record.add_mastered_skill(skill, now);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::time::fixed_clock;

    fn store() -> InMemoryProgressStore {
        InMemoryProgressStore::empty(fixed_clock()).with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn stars_accumulate_across_updates() {
        let store = store();
        store.add_stars(10).await.unwrap();
        let record = store.add_stars(5).await.unwrap();
        assert_eq!(record.total_stars(), 15);
        assert_eq!(store.current().await.unwrap().total_stars(), 15);
    }

    #[tokio::test]
    async fn returned_records_are_snapshots() {
        let store = store();
        let before = store.current().await.unwrap();
        store.add_stars(7).await.unwrap();
        // The copy handed out earlier must not observe the update.
        assert_eq!(before.total_stars(), 0);
    }

    #[tokio::test]
    async fn mastered_skills_deduplicate() {
        let store = store();
        let skill = SkillName::new("counting").unwrap();
        store.add_mastered_skill(skill.clone()).await.unwrap();
        let record = store.add_mastered_skill(skill).await.unwrap();
        assert_eq!(record.skills_mastered().len(), 1);
    }

    #[tokio::test]
    async fn level_zero_is_rejected() {
        let store = store();
        let err = store.set_level(Subject::Math, 0).await.unwrap_err();
        assert!(matches!(err, ContentError::Invalid(_)));
    }

    #[tokio::test]
    async fn embedded_progress_seed_loads() {
        let store = InMemoryProgressStore::from_embedded(fixed_clock())
            .unwrap()
            .with_latency(Duration::ZERO);
        let record = store.current().await.unwrap();
        assert!(record.total_stars() > 0);
    }
}

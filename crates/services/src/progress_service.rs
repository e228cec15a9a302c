use std::sync::Arc;

use tracing::info;

use content::repository::ProgressStore;
use quest_core::model::{ProgressRecord, SkillName, Subject};

use crate::error::ProgressServiceError;

/// Facade over the progress store for flows and the binary.
///
/// The store owns the single aggregate record; this service just gives
/// the rest of the app one typed place to go through.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Current aggregate progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` when the store cannot be read.
    pub async fn current(&self) -> Result<ProgressRecord, ProgressServiceError> {
        Ok(self.store.current().await?)
    }

    /// Add earned stars to the running total.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` when the update fails.
    pub async fn award_stars(&self, amount: u32) -> Result<ProgressRecord, ProgressServiceError> {
        let record = self.store.add_stars(amount).await?;
        info!(amount, total = record.total_stars(), "awarded stars");
        Ok(record)
    }

    /// Move a subject to a new level.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` when the update fails.
    pub async fn record_level(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        let record = self.store.set_level(subject, level).await?;
        info!(subject = %subject, level, "level recorded");
        Ok(record)
    }

    /// Mark a skill as mastered; duplicates are no-ops.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` when the update fails.
    pub async fn master_skill(
        &self,
        skill: SkillName,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        let record = self.store.add_mastered_skill(skill.clone()).await?;
        info!(skill = %skill, "skill mastered");
        Ok(record)
    }
}

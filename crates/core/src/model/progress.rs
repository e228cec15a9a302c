use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::ProgressId;
use crate::model::skill::{SkillName, Subject};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("level must be >= 1")]
    InvalidLevel,

    #[error("star award would overflow the total")]
    StarOverflow,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// The single aggregate progress record for the child using the app.
///
/// This is the only state shared across sessions. All mutation goes
/// through the methods below, which also refresh `last_active`; there is
/// no ambient global to reach around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    id: ProgressId,
    total_stars: u32,
    math_level: u32,
    reading_level: u32,
    skills_mastered: Vec<SkillName>,
    last_active: DateTime<Utc>,
}

impl ProgressRecord {
    /// Create a fresh record with no stars and both subjects at level 1.
    #[must_use]
    pub fn new(id: ProgressId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            total_stars: 0,
            math_level: 1,
            reading_level: 1,
            skills_mastered: Vec::new(),
            last_active: created_at,
        }
    }

    /// Rehydrate a record from stored fields.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidLevel` if either level is zero.
    pub fn from_parts(
        id: ProgressId,
        total_stars: u32,
        math_level: u32,
        reading_level: u32,
        skills_mastered: Vec<SkillName>,
        last_active: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        if math_level == 0 || reading_level == 0 {
            return Err(ProgressError::InvalidLevel);
        }
        let mut record = Self {
            id,
            total_stars,
            math_level,
            reading_level,
            skills_mastered: Vec::new(),
            last_active,
        };
        // Deduplicate on the way in so stored duplicates cannot stick.
        for skill in skills_mastered {
            record.insert_skill(skill);
        }
        Ok(record)
    }

    #[must_use]
    pub fn id(&self) -> ProgressId {
        self.id
    }

    #[must_use]
    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    #[must_use]
    pub fn level(&self, subject: Subject) -> u32 {
        match subject {
            Subject::Math => self.math_level,
            Subject::Reading => self.reading_level,
        }
    }

    #[must_use]
    pub fn skills_mastered(&self) -> &[SkillName] {
        &self.skills_mastered
    }

    #[must_use]
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    #[must_use]
    pub fn has_mastered(&self, skill: &SkillName) -> bool {
        self.skills_mastered.contains(skill)
    }

    /// Add earned stars to the running total.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::StarOverflow` if the total would exceed
    /// `u32::MAX`.
    pub fn add_stars(&mut self, amount: u32, at: DateTime<Utc>) -> Result<(), ProgressError> {
        self.total_stars = self
            .total_stars
            .checked_add(amount)
            .ok_or(ProgressError::StarOverflow)?;
        self.last_active = at;
        Ok(())
    }

    /// Set the level for one subject.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidLevel` for level zero.
    pub fn set_level(
        &mut self,
        subject: Subject,
        level: u32,
        at: DateTime<Utc>,
    ) -> Result<(), ProgressError> {
        if level == 0 {
            return Err(ProgressError::InvalidLevel);
        }
        match subject {
            Subject::Math => self.math_level = level,
            Subject::Reading => self.reading_level = level,
        }
        self.last_active = at;
        Ok(())
    }

    /// Record a mastered skill. Adding a skill twice is a no-op and does
    /// not touch `last_active`.
    pub fn add_mastered_skill(&mut self, skill: SkillName, at: DateTime<Utc>) {
        if self.insert_skill(skill) {
            self.last_active = at;
        }
    }

    fn insert_skill(&mut self, skill: SkillName) -> bool {
        if self.skills_mastered.contains(&skill) {
            return false;
        }
        self.skills_mastered.push(skill);
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

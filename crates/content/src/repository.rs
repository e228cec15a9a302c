use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quest_core::model::{
    Challenge, ChallengeError, ChallengeId, Maze, MazeError, MazeId, MazeQuestion, Position,
    ProgressError, ProgressId, ProgressRecord, SkillError, SkillName, Subject,
};

/// Errors surfaced by content sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("not found")]
    NotFound,

    #[error("content source unavailable: {0}")]
    Unavailable(String),

    #[error("invalid update: {0}")]
    Invalid(String),
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

/// Seed-data shape for a quiz challenge.
///
/// Mirrors the JSON the app ships with so sources can deserialize without
/// leaking wire concerns into the domain layer. Conversion into the
/// validated domain type happens in `into_challenge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRecord {
    #[serde(rename = "Id")]
    pub id: u64,
    pub subject: String,
    pub skill: String,
    pub difficulty: u8,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default = "default_reward")]
    pub reward: u32,
}

fn default_reward() -> u32 {
    3
}

impl ChallengeRecord {
    /// Convert the record into a validated domain `Challenge`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the subject or skill is malformed or the
    /// challenge fields fail domain validation.
    pub fn into_challenge(self) -> Result<Challenge, SeedError> {
        let subject: Subject = self.subject.parse()?;
        let skill = SkillName::new(self.skill)?;
        Ok(Challenge::new(
            ChallengeId::new(self.id),
            subject,
            skill,
            self.difficulty,
            self.question,
            self.options,
            self.correct_answer,
            self.hint,
            self.story,
            self.reward,
        )?)
    }
}

/// Seed-data shape for an arithmetic battle problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    #[serde(rename = "Id")]
    pub id: u64,
    pub problem: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ProblemRecord {
    /// Convert into a `Challenge` for the battle engine.
    ///
    /// Battle problems are always math, reward the flat mini-game score
    /// and carry the skill they drill.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` on domain validation failure.
    pub fn into_challenge(self, skill: &SkillName, reward: u32) -> Result<Challenge, SeedError> {
        Ok(Challenge::new(
            ChallengeId::new(self.id),
            Subject::Math,
            skill.clone(),
            1,
            self.problem,
            self.options,
            self.correct_answer,
            self.hint,
            None,
            reward,
        )?)
    }
}

/// Seed-data shape for a drag-and-drop puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    #[serde(rename = "Id")]
    pub id: u64,
    pub puzzle: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl PuzzleRecord {
    /// Convert into a `Challenge` for the puzzle engine.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` on domain validation failure.
    pub fn into_challenge(self, skill: &SkillName, reward: u32) -> Result<Challenge, SeedError> {
        Ok(Challenge::new(
            ChallengeId::new(self.id),
            Subject::Math,
            skill.clone(),
            1,
            self.puzzle,
            self.options,
            self.correct_answer,
            None,
            None,
            reward,
        )?)
    }
}

/// Seed-data shape for a maze question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeQuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub next_position: Position,
}

/// Seed-data shape for a maze.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeRecord {
    #[serde(rename = "Id")]
    pub id: u64,
    pub grid_size: u8,
    pub start_position: Position,
    pub end_position: Position,
    pub questions: Vec<MazeQuestionRecord>,
}

impl MazeRecord {
    /// Convert into a validated domain `Maze`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` on domain validation failure.
    pub fn into_maze(self) -> Result<Maze, SeedError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| {
                MazeQuestion::new(q.question, q.options, q.correct_answer, q.next_position)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Maze::new(
            MazeId::new(self.id),
            self.grid_size,
            self.start_position,
            self.end_position,
            questions,
        )?)
    }
}

/// Seed-data shape for the aggregate progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRow {
    #[serde(rename = "Id")]
    pub id: u64,
    pub total_stars: u32,
    pub math_level: u32,
    pub reading_level: u32,
    pub skills_mastered: Vec<String>,
    pub last_active: DateTime<Utc>,
}

impl ProgressRow {
    /// Convert into a validated domain `ProgressRecord`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if levels or skill names fail validation.
    pub fn into_record(self) -> Result<ProgressRecord, SeedError> {
        let skills = self
            .skills_mastered
            .into_iter()
            .map(SkillName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProgressRecord::from_parts(
            ProgressId::new(self.id),
            self.total_stars,
            self.math_level,
            self.reading_level,
            skills,
            self.last_active,
        )?)
    }
}

/// Errors raised while turning seed data into domain types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("seed data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Skill(#[from] SkillError),
}

//
// ─── SOURCE CONTRACTS ──────────────────────────────────────────────────────────
//

/// Supplies quiz challenges by subject.
#[async_trait]
pub trait ChallengeSource: Send + Sync {
    /// Fetch up to `count` challenges for a subject, sampled without
    /// replacement. Returns fewer (possibly zero) when the pool is small.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Unavailable` when the source cannot serve.
    async fn challenges_for(
        &self,
        subject: Subject,
        count: usize,
    ) -> Result<Vec<Challenge>, ContentError>;
}

/// Supplies the three mini-games with their content.
#[async_trait]
pub trait MiniGameSource: Send + Sync {
    /// All arithmetic battle problems, in seed order.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Unavailable` when the source cannot serve.
    async fn monster_math_problems(&self) -> Result<Vec<Challenge>, ContentError>;

    /// One maze picked uniformly at random from the pool.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` when the pool is empty.
    async fn number_maze(&self) -> Result<Maze, ContentError>;

    /// Up to `count` drag-and-drop puzzles, sampled without replacement.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Unavailable` when the source cannot serve.
    async fn math_puzzles(&self, count: usize) -> Result<Vec<Challenge>, ContentError>;
}

/// The single-owner progress context. Every mutation returns the updated
/// record so callers never hold a stale view.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Current aggregate progress.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the store cannot be read.
    async fn current(&self) -> Result<ProgressRecord, ContentError>;

    /// Add earned stars to the running total.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the update cannot be applied.
    async fn add_stars(&self, amount: u32) -> Result<ProgressRecord, ContentError>;

    /// Set the level for one subject.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the update cannot be applied.
    async fn set_level(&self, subject: Subject, level: u32) -> Result<ProgressRecord, ContentError>;

    /// Record a mastered skill (duplicates are no-ops).
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the update cannot be applied.
    async fn add_mastered_skill(&self, skill: SkillName) -> Result<ProgressRecord, ContentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_record_parses_and_validates() {
        let json = r#"{
            "Id": 1,
            "subject": "math",
            "skill": "addition",
            "difficulty": 1,
            "question": "3 + 4 = ?",
            "options": ["6", "7", "8"],
            "correctAnswer": "7"
        }"#;
        let record: ChallengeRecord = serde_json::from_str(json).unwrap();
        let challenge = record.into_challenge().unwrap();
        assert_eq!(challenge.subject(), Subject::Math);
        assert_eq!(challenge.reward(), 3);
        assert!(challenge.is_correct("7"));
    }

    #[test]
    fn bad_subject_is_a_seed_error() {
        let json = r#"{
            "Id": 1,
            "subject": "geography",
            "skill": "maps",
            "difficulty": 1,
            "question": "?",
            "options": ["a", "b"],
            "correctAnswer": "a"
        }"#;
        let record: ChallengeRecord = serde_json::from_str(json).unwrap();
        let err = record.into_challenge().unwrap_err();
        assert!(matches!(err, SeedError::Skill(_)));
    }

    #[test]
    fn maze_record_converts_with_bounds_checks() {
        let json = r#"{
            "Id": 1,
            "gridSize": 5,
            "startPosition": {"row": 0, "col": 0},
            "endPosition": {"row": 4, "col": 4},
            "questions": [
                {
                    "question": "1 + 1 = ?",
                    "options": ["2", "3"],
                    "correctAnswer": "2",
                    "nextPosition": {"row": 0, "col": 1}
                }
            ]
        }"#;
        let record: MazeRecord = serde_json::from_str(json).unwrap();
        let maze = record.into_maze().unwrap();
        assert_eq!(maze.start(), Position::new(0, 0));
        assert_eq!(maze.end(), Position::new(4, 4));
    }
}

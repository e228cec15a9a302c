use chrono::{DateTime, Utc};
use std::fmt;

use quest_core::model::{Challenge, ChallengeId, SessionSummary, Subject};

use super::progress::SessionProgress;
use crate::error::SessionError;
use crate::scoring::{Attempt, ScoringPolicy};

//
// ─── CHALLENGE REVIEW ──────────────────────────────────────────────────────────
//

/// Captures the outcome of answering one challenge within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeReview {
    pub challenge_id: ChallengeId,
    pub attempt: Attempt,
    pub correct: bool,
    pub stars_awarded: u32,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory playthrough of an ordered challenge sequence.
///
/// Steps through the challenges one at a time, scoring each attempt via
/// the configured policy. A session is created fresh for every
/// playthrough and replaced wholesale on restart, never patched.
pub struct QuizSession {
    subject: Subject,
    challenges: Vec<Challenge>,
    policy: ScoringPolicy,
    current: usize,
    reviews: Vec<ChallengeReview>,
    stars_earned: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a new session over the given challenges.
    ///
    /// `started_at` should come from the services layer clock to keep
    /// time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` if no challenges are provided;
    /// the caller surfaces that with a retry action instead of holding a
    /// broken session.
    pub fn new(
        subject: Subject,
        challenges: Vec<Challenge>,
        policy: ScoringPolicy,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if challenges.is_empty() {
            return Err(SessionError::NoContent);
        }

        Ok(Self {
            subject,
            challenges,
            policy,
            current: 0,
            reviews: Vec::new(),
            stars_earned: 0,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn reviews(&self) -> &[ChallengeReview] {
        &self.reviews
    }

    /// Total number of challenges in this session.
    #[must_use]
    pub fn total_challenges(&self) -> usize {
        self.challenges.len()
    }

    /// Number of challenges already answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.reviews.len()
    }

    /// Stars accumulated so far.
    #[must_use]
    pub fn stars_earned(&self) -> u32 {
        self.stars_earned
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.reviews.iter().filter(|review| review.correct).count()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_challenges(),
            answered: self.answered_count(),
            remaining: self.challenges.len().saturating_sub(self.current),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.challenges.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Score an attempt at the current challenge and advance the cursor.
    ///
    /// `answered_at` should come from the services layer clock. When the
    /// cursor passes the last challenge the session records its
    /// completion timestamp; any submission after that point returns
    /// `SessionError::Completed` and leaves every counter untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already
    /// finished.
    pub fn submit(
        &mut self,
        attempt: Attempt,
        answered_at: DateTime<Utc>,
    ) -> Result<&ChallengeReview, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let Some(challenge) = self.challenges.get(self.current) else {
            return Err(SessionError::Completed);
        };

        let (correct, stars_awarded) = self.policy.score(challenge, &attempt);
        self.reviews.push(ChallengeReview {
            challenge_id: challenge.id(),
            attempt,
            correct,
            stars_awarded,
        });
        self.stars_earned = self.stars_earned.saturating_add(stars_awarded);

        self.current += 1;
        if self.current >= self.challenges.len() {
            self.completed_at = Some(answered_at);
        }

        self.reviews.last().ok_or(SessionError::Completed)
    }

    /// Build the end-of-session summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session has not finished,
    /// and propagates summary validation failures.
    pub fn build_summary(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::Completed)?;
        let total = u32::try_from(self.total_challenges()).unwrap_or(u32::MAX);
        let correct = u32::try_from(self.correct_count()).unwrap_or(u32::MAX);
        Ok(SessionSummary::new(
            self.subject,
            self.started_at,
            completed_at,
            total,
            correct,
            self.stars_earned,
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject", &self.subject)
            .field("challenges_len", &self.challenges.len())
            .field("current", &self.current)
            .field("stars_earned", &self.stars_earned)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

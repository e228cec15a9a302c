use std::sync::Arc;

use tracing::{info, warn};

use content::repository::{ChallengeSource, ProgressStore};
use quest_core::model::{SessionSummary, Subject};
use quest_core::Clock;

use super::service::{ChallengeReview, QuizSession};
use crate::error::SessionError;
use crate::scoring::{Attempt, ScoringPolicy};

/// Result of answering a single challenge in a flow-managed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub review: ChallengeReview,
    pub is_complete: bool,
    /// Present once the session completes and its stars were awarded.
    pub summary: Option<SessionSummary>,
}

/// Orchestrates a quiz playthrough: retrieval, session stepping, and the
/// one progress-store award when the session completes.
#[derive(Clone)]
pub struct ChallengeFlow {
    clock: Clock,
    challenges: Arc<dyn ChallengeSource>,
    progress: Arc<dyn ProgressStore>,
    challenge_count: usize,
    policy: ScoringPolicy,
}

impl ChallengeFlow {
    /// Five challenges per session, like the original challenge pages.
    pub const DEFAULT_CHALLENGE_COUNT: usize = 5;

    #[must_use]
    pub fn new(
        clock: Clock,
        challenges: Arc<dyn ChallengeSource>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            clock,
            challenges,
            progress,
            challenge_count: Self::DEFAULT_CHALLENGE_COUNT,
            policy: ScoringPolicy::quiz_default(),
        }
    }

    #[must_use]
    pub fn with_challenge_count(mut self, count: usize) -> Self {
        self.challenge_count = count;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start a new session for the given subject.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when the source has nothing for
    /// the subject, or `SessionError::Retrieval` when it fails outright.
    pub async fn start(&self, subject: Subject) -> Result<QuizSession, SessionError> {
        let challenges = self
            .challenges
            .challenges_for(subject, self.challenge_count)
            .await
            .map_err(|e| {
                warn!(subject = %subject, error = %e, "challenge retrieval failed");
                SessionError::Retrieval(e)
            })?;
        let session = QuizSession::new(subject, challenges, self.policy, self.clock.now())?;
        info!(subject = %subject, total = session.total_challenges(), "session started");
        Ok(session)
    }

    /// Replace a session wholesale with a freshly retrieved one.
    ///
    /// # Errors
    ///
    /// Same failure modes as `start`.
    pub async fn restart(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        *session = self.start(session.subject()).await?;
        Ok(())
    }

    /// Answer the current challenge; on the completing answer, award the
    /// earned stars to the progress store and hand back the summary.
    ///
    /// The session stays complete even if the award fails; call
    /// `finalize` to retry the award.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` for post-completion submissions
    /// and `SessionError::Retrieval` when the star award fails.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        attempt: Attempt,
    ) -> Result<SessionAnswerResult, SessionError> {
        let review = session.submit(attempt, self.clock.now())?.clone();

        let summary = if session.is_complete() {
            Some(self.finalize(session).await?)
        } else {
            None
        };

        Ok(SessionAnswerResult {
            review,
            is_complete: session.is_complete(),
            summary,
        })
    }

    /// Award the completed session's stars and return its summary.
    ///
    /// Useful to retry after a transient store failure during the final
    /// answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is not complete,
    /// and `SessionError::Retrieval` if the store rejects the award.
    pub async fn finalize(&self, session: &QuizSession) -> Result<SessionSummary, SessionError> {
        let summary = session.build_summary()?;
        self.progress.add_stars(summary.stars_earned()).await?;
        info!(
            subject = %summary.subject(),
            stars = summary.stars_earned(),
            accuracy = summary.accuracy(),
            "session completed"
        );
        Ok(summary)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

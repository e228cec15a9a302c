use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::skill::Subject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("summary covers zero challenges")]
    NoChallenges,

    #[error("correct count ({correct}) exceeds total challenges ({total})")]
    CountMismatch { total: u32, correct: u32 },
}

/// Encouragement tier shown at the end of a session, keyed off accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    /// 100% accuracy.
    Perfect,
    /// 80% and up.
    Fantastic,
    /// 60% and up.
    Great,
    /// Everything below.
    KeepPracticing,
}

impl PerformanceTier {
    #[must_use]
    pub fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            100.. => PerformanceTier::Perfect,
            80..=99 => PerformanceTier::Fantastic,
            60..=79 => PerformanceTier::Great,
            _ => PerformanceTier::KeepPracticing,
        }
    }

    /// Message displayed with the results.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            PerformanceTier::Perfect => "Perfect Score! You're Amazing!",
            PerformanceTier::Fantastic => "Fantastic Job! Keep It Up!",
            PerformanceTier::Great => "Great Work! You're Learning!",
            PerformanceTier::KeepPracticing => "Nice Try! Practice Makes Perfect!",
        }
    }
}

/// Aggregate summary for a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    subject: Subject,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_challenges: u32,
    correct: u32,
    stars_earned: u32,
}

impl SessionSummary {
    /// Build a summary from session counters.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at`
    /// is before `started_at`, `NoChallenges` for an empty session, and
    /// `CountMismatch` if more answers were correct than challenges exist.
    pub fn new(
        subject: Subject,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_challenges: u32,
        correct: u32,
        stars_earned: u32,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if total_challenges == 0 {
            return Err(SessionSummaryError::NoChallenges);
        }
        if correct > total_challenges {
            return Err(SessionSummaryError::CountMismatch {
                total: total_challenges,
                correct,
            });
        }

        Ok(Self {
            subject,
            started_at,
            completed_at,
            total_challenges,
            correct,
            stars_earned,
        })
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_challenges(&self) -> u32 {
        self.total_challenges
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn stars_earned(&self) -> u32 {
        self.stars_earned
    }

    /// Whole-percent accuracy, rounded to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn accuracy(&self) -> u32 {
        let scaled = u64::from(self.correct) * 100 + u64::from(self.total_challenges) / 2;
        (scaled / u64::from(self.total_challenges)) as u32
    }

    /// Session duration in whole seconds.
    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds()
    }

    #[must_use]
    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_accuracy(self.accuracy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn summary_derives_accuracy_and_tier() {
        let now = fixed_now();
        let summary = SessionSummary::new(
            Subject::Math,
            now,
            now + Duration::seconds(90),
            5,
            4,
            13,
        )
        .unwrap();

        assert_eq!(summary.accuracy(), 80);
        assert_eq!(summary.tier(), PerformanceTier::Fantastic);
        assert_eq!(summary.duration_secs(), 90);
    }

    #[test]
    fn perfect_run_gets_the_top_tier() {
        let now = fixed_now();
        let summary = SessionSummary::new(Subject::Reading, now, now, 5, 5, 15).unwrap();
        assert_eq!(summary.tier(), PerformanceTier::Perfect);
        assert_eq!(
            summary.tier().message(),
            "Perfect Score! You're Amazing!"
        );
    }

    #[test]
    fn more_correct_than_total_rejected() {
        let now = fixed_now();
        let err = SessionSummary::new(Subject::Math, now, now, 3, 4, 0).unwrap_err();
        assert!(matches!(err, SessionSummaryError::CountMismatch { .. }));
    }

    #[test]
    fn backwards_time_range_rejected() {
        let now = fixed_now();
        let err = SessionSummary::new(Subject::Math, now, now - Duration::seconds(1), 3, 1, 0)
            .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }
}

use quest_core::model::Challenge;

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// What the player did with the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// A submitted candidate answer.
    Answer(String),
    /// The countdown expired before anything was submitted.
    TimedOut,
}

impl Attempt {
    #[must_use]
    pub fn answer(candidate: impl Into<String>) -> Self {
        Attempt::Answer(candidate.into())
    }

    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Attempt::TimedOut)
    }
}

//
// ─── SCORING POLICY ────────────────────────────────────────────────────────────
//

/// How stars are awarded per item.
///
/// Correctness is exact string equality only. A timed-out attempt always
/// scores zero regardless of policy; time-boxed auto-advance is the
/// caller submitting `Attempt::TimedOut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Flat reward for a correct answer, nothing otherwise. The
    /// mini-games use this with their fixed score value.
    Fixed { stars: u32 },

    /// Full reward for a correct answer, a consolation reward for any
    /// wrong-but-submitted answer, zero for a timeout.
    Tiered { full: u32, partial: u32 },

    /// Reward whatever the challenge itself declares, nothing for a miss.
    ItemReward,
}

impl ScoringPolicy {
    /// The quiz default: 3 stars for correct, 1 for trying, 0 for a
    /// timeout.
    #[must_use]
    pub fn quiz_default() -> Self {
        ScoringPolicy::Tiered { full: 3, partial: 1 }
    }

    /// Evaluate an attempt against a challenge.
    ///
    /// Returns the correctness verdict and the stars awarded.
    #[must_use]
    pub fn score(&self, challenge: &Challenge, attempt: &Attempt) -> (bool, u32) {
        let candidate = match attempt {
            Attempt::Answer(candidate) => candidate,
            Attempt::TimedOut => return (false, 0),
        };
        let correct = challenge.is_correct(candidate);
        let stars = match (self, correct) {
            (ScoringPolicy::Fixed { stars }, true) => *stars,
            (ScoringPolicy::Fixed { .. }, false) => 0,
            (ScoringPolicy::Tiered { full, .. }, true) => *full,
            (ScoringPolicy::Tiered { partial, .. }, false) => *partial,
            (ScoringPolicy::ItemReward, true) => challenge.reward(),
            (ScoringPolicy::ItemReward, false) => 0,
        };
        (correct, stars)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::model::{ChallengeId, SkillName, Subject};

    fn challenge() -> Challenge {
        Challenge::new(
            ChallengeId::new(1),
            Subject::Math,
            SkillName::new("addition").unwrap(),
            1,
            "2 + 2 = ?",
            vec!["3".to_string(), "4".to_string()],
            "4",
            None,
            None,
            5,
        )
        .unwrap()
    }

    #[test]
    fn tiered_awards_full_partial_zero() {
        let policy = ScoringPolicy::quiz_default();
        let challenge = challenge();

        assert_eq!(policy.score(&challenge, &Attempt::answer("4")), (true, 3));
        assert_eq!(policy.score(&challenge, &Attempt::answer("3")), (false, 1));
        assert_eq!(policy.score(&challenge, &Attempt::TimedOut), (false, 0));
    }

    #[test]
    fn fixed_awards_only_on_correct() {
        let policy = ScoringPolicy::Fixed { stars: 10 };
        let challenge = challenge();

        assert_eq!(policy.score(&challenge, &Attempt::answer("4")), (true, 10));
        assert_eq!(policy.score(&challenge, &Attempt::answer("3")), (false, 0));
    }

    #[test]
    fn item_reward_uses_the_challenge_weight() {
        let policy = ScoringPolicy::ItemReward;
        let challenge = challenge();
        assert_eq!(policy.score(&challenge, &Attempt::answer("4")), (true, 5));
    }

    #[test]
    fn matching_is_exact_equality() {
        let policy = ScoringPolicy::quiz_default();
        let challenge = challenge();
        // " 4" is not "4"; no fuzzy matching.
        assert!(!policy.score(&challenge, &Attempt::answer(" 4")).0);
    }
}

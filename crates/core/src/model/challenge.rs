use thiserror::Error;

use crate::model::ids::ChallengeId;
use crate::model::skill::{SkillName, Subject};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("challenge prompt cannot be empty")]
    EmptyPrompt,

    #[error("challenge needs at least two answer options, got {0}")]
    TooFewOptions(usize),

    #[error("answer option cannot be empty")]
    EmptyOption,

    #[error("correct answer {answer:?} is not among the options")]
    AnswerNotInOptions { answer: String },

    #[error("star reward must be > 0")]
    InvalidReward,

    #[error("story text cannot be empty when present")]
    EmptyStory,
}

//
// ─── CHALLENGE ─────────────────────────────────────────────────────────────────
//

/// A single question unit: a prompt, candidate answers and the one
/// designated correct answer.
///
/// Immutable once constructed. Story challenges additionally carry a
/// narration text that is read to the child before the question is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    id: ChallengeId,
    subject: Subject,
    skill: SkillName,
    difficulty: u8,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    hint: Option<String>,
    story: Option<String>,
    reward: u32,
}

impl Challenge {
    /// Create a validated challenge.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` when the prompt is empty, fewer than two
    /// options are given, any option is blank, the correct answer is not
    /// one of the options, the reward is zero, or a story is present but
    /// blank.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ChallengeId,
        subject: Subject,
        skill: SkillName,
        difficulty: u8,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        hint: Option<String>,
        story: Option<String>,
        reward: u32,
    ) -> Result<Self, ChallengeError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ChallengeError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(ChallengeError::TooFewOptions(options.len()));
        }
        if options.iter().any(|option| option.trim().is_empty()) {
            return Err(ChallengeError::EmptyOption);
        }
        let correct_answer = correct_answer.into();
        if !options.iter().any(|option| option == &correct_answer) {
            return Err(ChallengeError::AnswerNotInOptions {
                answer: correct_answer,
            });
        }
        if reward == 0 {
            return Err(ChallengeError::InvalidReward);
        }
        if let Some(text) = &story {
            if text.trim().is_empty() {
                return Err(ChallengeError::EmptyStory);
            }
        }

        Ok(Self {
            id,
            subject,
            skill,
            difficulty,
            prompt,
            options,
            correct_answer,
            hint,
            story,
            reward,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChallengeId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn skill(&self) -> &SkillName {
        &self.skill
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Narration text for story challenges.
    #[must_use]
    pub fn story(&self) -> Option<&str> {
        self.story.as_deref()
    }

    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Exact-equality answer check; no partial credit, no fuzzy matching.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct_answer == candidate
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn build(prompt: &str, opts: &[&str], correct: &str) -> Result<Challenge, ChallengeError> {
        Challenge::new(
            ChallengeId::new(1),
            Subject::Math,
            SkillName::new("addition").unwrap(),
            1,
            prompt,
            options(opts),
            correct,
            None,
            None,
            3,
        )
    }

    #[test]
    fn valid_challenge_builds() {
        let challenge = build("2 + 2 = ?", &["3", "4"], "4").unwrap();
        assert_eq!(challenge.prompt(), "2 + 2 = ?");
        assert!(challenge.is_correct("4"));
        assert!(!challenge.is_correct("3"));
    }

    #[test]
    fn empty_prompt_rejected() {
        let err = build("  ", &["3", "4"], "4").unwrap_err();
        assert_eq!(err, ChallengeError::EmptyPrompt);
    }

    #[test]
    fn single_option_rejected() {
        let err = build("2 + 2 = ?", &["4"], "4").unwrap_err();
        assert_eq!(err, ChallengeError::TooFewOptions(1));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let err = build("2 + 2 = ?", &["3", "5"], "4").unwrap_err();
        assert!(matches!(err, ChallengeError::AnswerNotInOptions { .. }));
    }

    #[test]
    fn blank_story_rejected() {
        let err = Challenge::new(
            ChallengeId::new(2),
            Subject::Reading,
            SkillName::new("comprehension").unwrap(),
            1,
            "Who helped the cat?",
            options(&["the dog", "the bird"]),
            "the dog",
            None,
            Some("  ".to_string()),
            3,
        )
        .unwrap_err();
        assert_eq!(err, ChallengeError::EmptyStory);
    }
}

use std::fmt;

use quest_core::model::Challenge;

use crate::error::SessionError;
use crate::scoring::{Attempt, ScoringPolicy};

/// Outcome of one dropped answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleDrop {
    pub correct: bool,
    pub score: u32,
    pub solved_all: bool,
}

/// Drag-and-drop puzzles: a correct drop scores and advances, a wrong
/// drop stays on the same puzzle for another try.
pub struct PuzzleRound {
    puzzles: Vec<Challenge>,
    current: usize,
    score: u32,
    complete: bool,
}

impl PuzzleRound {
    /// Create a round over the given puzzles.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when no puzzles are provided.
    pub fn new(puzzles: Vec<Challenge>) -> Result<Self, SessionError> {
        if puzzles.is_empty() {
            return Err(SessionError::NoContent);
        }
        Ok(Self {
            puzzles,
            current: 0,
            score: 0,
            complete: false,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub fn current_puzzle(&self) -> Option<&Challenge> {
        if self.complete {
            return None;
        }
        self.puzzles.get(self.current)
    }

    /// 1-based number of the puzzle being shown.
    #[must_use]
    pub fn puzzle_number(&self) -> usize {
        self.current + 1
    }

    #[must_use]
    pub fn total_puzzles(&self) -> usize {
        self.puzzles.len()
    }

    /// Drop an answer onto the current puzzle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once every puzzle is solved.
    pub fn drop_answer(&mut self, candidate: &str) -> Result<PuzzleDrop, SessionError> {
        if self.complete {
            return Err(SessionError::Completed);
        }
        let Some(puzzle) = self.puzzles.get(self.current) else {
            return Err(SessionError::Completed);
        };

        let (correct, points) = ScoringPolicy::ItemReward.score(puzzle, &Attempt::answer(candidate));
        if correct {
            self.score = self.score.saturating_add(points);
            if self.current + 1 >= self.puzzles.len() {
                self.complete = true;
            } else {
                self.current += 1;
            }
        }

        Ok(PuzzleDrop {
            correct,
            score: self.score,
            solved_all: self.complete,
        })
    }

    /// Start over with a fresh puzzle set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when the new set is empty.
    pub fn restart(&mut self, puzzles: Vec<Challenge>) -> Result<(), SessionError> {
        *self = Self::new(puzzles)?;
        Ok(())
    }
}

impl fmt::Debug for PuzzleRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleRound")
            .field("puzzles_len", &self.puzzles.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("complete", &self.complete)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::MazeId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MazeError {
    #[error("maze grid size must be > 1")]
    InvalidGridSize,

    #[error("position ({0}) is outside the {1}x{1} grid")]
    OutOfBounds(Position, u8),

    #[error("maze start and end positions must differ")]
    StartEqualsEnd,

    #[error("maze needs at least one question")]
    NoQuestions,

    #[error("maze question prompt cannot be empty")]
    EmptyPrompt,

    #[error("maze question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer {answer:?} is not among the options")]
    AnswerNotInOptions { answer: String },
}

//
// ─── POSITION ──────────────────────────────────────────────────────────────────
//

/// Discrete grid coordinate, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    #[must_use]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when the coordinate fits inside a `grid_size` x `grid_size` grid.
    #[must_use]
    pub fn in_bounds(&self, grid_size: u8) -> bool {
        self.row < grid_size && self.col < grid_size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.row, self.col)
    }
}

//
// ─── MAZE QUESTION ─────────────────────────────────────────────────────────────
//

/// One step of the maze: answer correctly to move to `next_position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeQuestion {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    next_position: Position,
}

impl MazeQuestion {
    /// Create a validated maze question.
    ///
    /// Bounds of `next_position` are checked by `Maze::new`, which knows
    /// the grid size.
    ///
    /// # Errors
    ///
    /// Returns `MazeError` for an empty prompt, fewer than two options, or
    /// a correct answer that is not among the options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        next_position: Position,
    ) -> Result<Self, MazeError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(MazeError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(MazeError::TooFewOptions(options.len()));
        }
        let correct_answer = correct_answer.into();
        if !options.iter().any(|option| option == &correct_answer) {
            return Err(MazeError::AnswerNotInOptions {
                answer: correct_answer,
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
            next_position,
        })
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
    pub fn next_position(&self) -> Position {
        self.next_position
    }

    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct_answer == candidate
    }
}

//
// ─── MAZE ──────────────────────────────────────────────────────────────────────
//

/// A square grid with a start, a goal, and an ordered question list whose
/// correct answers trace a path through the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    id: MazeId,
    grid_size: u8,
    start: Position,
    end: Position,
    questions: Vec<MazeQuestion>,
}

impl Maze {
    /// Create a validated maze.
    ///
    /// # Errors
    ///
    /// Returns `MazeError` when the grid is degenerate, start/end coincide
    /// or fall outside the grid, there are no questions, or any question
    /// points outside the grid.
    pub fn new(
        id: MazeId,
        grid_size: u8,
        start: Position,
        end: Position,
        questions: Vec<MazeQuestion>,
    ) -> Result<Self, MazeError> {
        if grid_size < 2 {
            return Err(MazeError::InvalidGridSize);
        }
        for position in [start, end] {
            if !position.in_bounds(grid_size) {
                return Err(MazeError::OutOfBounds(position, grid_size));
            }
        }
        if start == end {
            return Err(MazeError::StartEqualsEnd);
        }
        if questions.is_empty() {
            return Err(MazeError::NoQuestions);
        }
        for question in &questions {
            let next = question.next_position();
            if !next.in_bounds(grid_size) {
                return Err(MazeError::OutOfBounds(next, grid_size));
            }
        }

        Ok(Self {
            id,
            grid_size,
            start,
            end,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> MazeId {
        self.id
    }

    #[must_use]
    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Position {
        self.end
    }

    #[must_use]
    pub fn questions(&self) -> &[MazeQuestion] {
        &self.questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, next: Position) -> MazeQuestion {
        MazeQuestion::new(
            prompt,
            vec!["1".to_string(), "2".to_string()],
            "2",
            next,
        )
        .unwrap()
    }

    #[test]
    fn maze_builds_with_valid_parts() {
        let maze = Maze::new(
            MazeId::new(1),
            5,
            Position::new(0, 0),
            Position::new(4, 4),
            vec![question("1 + 1 = ?", Position::new(0, 1))],
        )
        .unwrap();
        assert_eq!(maze.grid_size(), 5);
        assert_eq!(maze.questions().len(), 1);
    }

    #[test]
    fn out_of_bounds_next_position_rejected() {
        let err = Maze::new(
            MazeId::new(1),
            5,
            Position::new(0, 0),
            Position::new(4, 4),
            vec![question("1 + 1 = ?", Position::new(5, 0))],
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::OutOfBounds(_, 5)));
    }

    #[test]
    fn start_equals_end_rejected() {
        let err = Maze::new(
            MazeId::new(1),
            5,
            Position::new(2, 2),
            Position::new(2, 2),
            vec![question("1 + 1 = ?", Position::new(0, 1))],
        )
        .unwrap_err();
        assert_eq!(err, MazeError::StartEqualsEnd);
    }

    #[test]
    fn question_answer_must_be_an_option() {
        let err = MazeQuestion::new(
            "2 + 3 = ?",
            vec!["4".to_string(), "6".to_string()],
            "5",
            Position::new(0, 1),
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::AnswerNotInOptions { .. }));
    }
}

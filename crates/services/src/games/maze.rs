use std::fmt;

use content::MINI_GAME_REWARD;
use quest_core::model::{Maze, MazeQuestion, Position};

use crate::error::SessionError;

/// Outcome of one answer in the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeStep {
    pub correct: bool,
    pub position: Position,
    pub reached_goal: bool,
    pub score: u32,
}

/// Maze navigation: each correct answer moves the player one designated
/// step; a wrong answer leaves everything in place, so the same question
/// can be retried without penalty.
///
/// Invariant: the current position always equals the last element of the
/// visited path.
pub struct MazeRun {
    maze: Maze,
    question_index: usize,
    position: Position,
    path: Vec<Position>,
    score: u32,
    complete: bool,
}

impl MazeRun {
    /// Start a run at the maze's start position.
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        let start = maze.start();
        Self {
            maze,
            question_index: 0,
            position: start,
            path: vec![start],
            score: 0,
            complete: false,
        }
    }

    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Positions visited so far, starting with the maze's start cell.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True when the player stands on the goal cell.
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.position == self.maze.end()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&MazeQuestion> {
        if self.complete {
            return None;
        }
        self.maze.questions().get(self.question_index)
    }

    /// 1-based number of the question being shown.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.question_index + 1
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.maze.questions().len()
    }

    /// Answer the current question.
    ///
    /// A correct answer moves to the question's designated next position,
    /// extends the path, scores, and advances to the next question. The
    /// run completes on reaching the goal or exhausting the questions. A
    /// wrong answer changes nothing; the player may retry indefinitely.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the run is complete.
    pub fn answer(&mut self, candidate: &str) -> Result<MazeStep, SessionError> {
        if self.complete {
            return Err(SessionError::Completed);
        }
        let Some(question) = self.maze.questions().get(self.question_index) else {
            return Err(SessionError::Completed);
        };

        if !question.is_correct(candidate) {
            return Ok(MazeStep {
                correct: false,
                position: self.position,
                reached_goal: false,
                score: self.score,
            });
        }

        let next = question.next_position();
        self.position = next;
        self.path.push(next);
        self.score = self.score.saturating_add(MINI_GAME_REWARD);

        if next == self.maze.end() || self.question_index + 1 >= self.maze.questions().len() {
            self.complete = true;
        } else {
            self.question_index += 1;
        }

        debug_assert_eq!(Some(&self.position), self.path.last());

        Ok(MazeStep {
            correct: true,
            position: next,
            reached_goal: next == self.maze.end(),
            score: self.score,
        })
    }

    /// Reset the run in place; the maze itself is immutable and reused.
    pub fn restart(&mut self) {
        let start = self.maze.start();
        self.question_index = 0;
        self.position = start;
        self.path = vec![start];
        self.score = 0;
        self.complete = false;
    }
}

impl fmt::Debug for MazeRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MazeRun")
            .field("maze_id", &self.maze.id())
            .field("question_index", &self.question_index)
            .field("position", &self.position)
            .field("path_len", &self.path.len())
            .field("score", &self.score)
            .field("complete", &self.complete)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use std::sync::Arc;

use tracing::info;

use content::repository::{ContentError, MiniGameSource};

use super::maze::MazeRun;
use super::monster::MonsterBattle;
use super::puzzle::PuzzleRound;
use crate::error::SessionError;

/// Builds mini-game sessions from a content source.
#[derive(Clone)]
pub struct GameLauncher {
    source: Arc<dyn MiniGameSource>,
    puzzle_count: usize,
}

impl GameLauncher {
    /// Five puzzles per round, like the original puzzle page.
    pub const DEFAULT_PUZZLE_COUNT: usize = 5;

    #[must_use]
    pub fn new(source: Arc<dyn MiniGameSource>) -> Self {
        Self {
            source,
            puzzle_count: Self::DEFAULT_PUZZLE_COUNT,
        }
    }

    #[must_use]
    pub fn with_puzzle_count(mut self, count: usize) -> Self {
        self.puzzle_count = count;
        self
    }

    /// Start an arithmetic battle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` for an empty problem pool and
    /// `SessionError::Retrieval` for source failures.
    pub async fn monster_battle(&self) -> Result<MonsterBattle, SessionError> {
        let problems = self.source.monster_math_problems().await?;
        let battle = MonsterBattle::new(problems)?;
        info!(problems = battle.total_problems(), "monster battle started");
        Ok(battle)
    }

    /// Start a maze run on a randomly picked maze.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when the maze pool is empty and
    /// `SessionError::Retrieval` for source failures.
    pub async fn maze_run(&self) -> Result<MazeRun, SessionError> {
        let maze = match self.source.number_maze().await {
            Ok(maze) => maze,
            Err(ContentError::NotFound) => return Err(SessionError::NoContent),
            Err(e) => return Err(SessionError::Retrieval(e)),
        };
        info!(maze = %maze.id(), questions = maze.questions().len(), "maze run started");
        Ok(MazeRun::new(maze))
    }

    /// Start a puzzle round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` for an empty puzzle pool and
    /// `SessionError::Retrieval` for source failures.
    pub async fn puzzle_round(&self) -> Result<PuzzleRound, SessionError> {
        let puzzles = self.source.math_puzzles(self.puzzle_count).await?;
        let round = PuzzleRound::new(puzzles)?;
        info!(puzzles = round.total_puzzles(), "puzzle round started");
        Ok(round)
    }
}

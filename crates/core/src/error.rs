use thiserror::Error;

use crate::model::{ChallengeError, MazeError, ProgressError, SessionSummaryError, SkillError};

/// Umbrella error for domain validation failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Challenge(#[from] ChallengeError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Skill(#[from] SkillError),
}

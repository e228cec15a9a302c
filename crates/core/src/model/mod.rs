mod challenge;
mod ids;
mod maze;
mod progress;
mod skill;
mod summary;

pub use ids::{ChallengeId, MazeId, ParseIdError, ProgressId};
pub use skill::{SkillError, SkillName, Subject};

pub use challenge::{Challenge, ChallengeError};
pub use maze::{Maze, MazeError, MazeQuestion, Position};
pub use progress::{ProgressError, ProgressRecord};
pub use summary::{PerformanceTier, SessionSummary, SessionSummaryError};

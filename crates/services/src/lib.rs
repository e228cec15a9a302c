#![forbid(unsafe_code)]

pub mod error;
pub mod games;
pub mod narration;
pub mod progress_service;
pub mod scoring;
pub mod sessions;
pub mod timer;

pub use quest_core::Clock;
pub use sessions as session;

pub use error::{ProgressServiceError, SessionError};
pub use games::{GameLauncher, MazeRun, MonsterBattle, PuzzleRound};
pub use narration::{NarrationObserver, NarrationState, Narrator, SpeechBackend};
pub use progress_service::ProgressService;
pub use scoring::{Attempt, ScoringPolicy};
pub use sessions::{
    ChallengeFlow, ChallengeReview, QuizSession, SessionAnswerResult, SessionProgress,
};
pub use timer::{Countdown, CountdownHandle, CountdownState, TimerEvent};

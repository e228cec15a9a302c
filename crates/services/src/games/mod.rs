mod launcher;
mod maze;
mod monster;
mod puzzle;

pub use launcher::GameLauncher;
pub use maze::{MazeRun, MazeStep};
pub use monster::{
    BattleOutcome, BattleRound, MonsterBattle, HIT_DAMAGE, MONSTER_MAX_HP, PROBLEM_TIME_LIMIT,
};
pub use puzzle::{PuzzleDrop, PuzzleRound};

use std::time::Duration;

use async_trait::async_trait;
use rand::rng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use quest_core::model::{Challenge, Maze, SkillName, Subject};

use crate::repository::{
    ChallengeRecord, ChallengeSource, ContentError, MazeRecord, MiniGameSource, ProblemRecord,
    PuzzleRecord, SeedError,
};

/// Simulated retrieval latency matching the original mock services.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

const CHALLENGES_JSON: &str = include_str!("data/challenges.json");
const MINI_GAMES_JSON: &str = include_str!("data/mini_games.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MiniGamesFile {
    monster_math: Vec<ProblemRecord>,
    number_maze: Vec<MazeRecord>,
    math_puzzles: Vec<PuzzleRecord>,
}

/// JSON-seeded in-memory catalog with simulated latency.
///
/// All retrieval methods return independent clones of the pool entries;
/// callers may mutate what they get back without affecting the catalog
/// or each other.
pub struct StaticCatalog {
    challenges: Vec<Challenge>,
    battle_problems: Vec<Challenge>,
    mazes: Vec<Maze>,
    puzzles: Vec<Challenge>,
    latency: Duration,
}

impl StaticCatalog {
    /// Load the catalog from the embedded seed data.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the embedded JSON is malformed or fails
    /// domain validation.
    pub fn from_embedded() -> Result<Self, SeedError> {
        Self::from_json(CHALLENGES_JSON, MINI_GAMES_JSON)
    }

    /// Load a catalog from caller-provided JSON seeds.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if either document is malformed or fails
    /// domain validation.
    pub fn from_json(challenges_json: &str, mini_games_json: &str) -> Result<Self, SeedError> {
        let challenge_records: Vec<ChallengeRecord> = serde_json::from_str(challenges_json)?;
        let challenges = challenge_records
            .into_iter()
            .map(ChallengeRecord::into_challenge)
            .collect::<Result<Vec<_>, _>>()?;

        let games: MiniGamesFile = serde_json::from_str(mini_games_json)?;
        let arithmetic = SkillName::new("arithmetic")?;
        let battle_problems = games
            .monster_math
            .into_iter()
            .map(|record| record.into_challenge(&arithmetic, MINI_GAME_REWARD))
            .collect::<Result<Vec<_>, _>>()?;
        let mazes = games
            .number_maze
            .into_iter()
            .map(MazeRecord::into_maze)
            .collect::<Result<Vec<_>, _>>()?;
        let puzzle_skill = SkillName::new("puzzles")?;
        let puzzles = games
            .math_puzzles
            .into_iter()
            .map(|record| record.into_challenge(&puzzle_skill, MINI_GAME_REWARD))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            challenges,
            battle_problems,
            mazes,
            puzzles,
            latency: DEFAULT_LATENCY,
        })
    }

    /// Override the simulated latency (zero for tests).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of quiz challenges in the pool, across all subjects.
    #[must_use]
    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Flat score every mini-game item awards on success.
pub const MINI_GAME_REWARD: u32 = 10;

/// Uniform sample without replacement: shuffle an explicit copy, then
/// truncate. Never touches the pool itself.
fn sample(pool: &[Challenge], count: usize) -> Vec<Challenge> {
    let mut copy: Vec<Challenge> = pool.to_vec();
    let mut rng = rng();
    copy.as_mut_slice().shuffle(&mut rng);
    copy.truncate(count);
    copy
}

#[async_trait]
impl ChallengeSource for StaticCatalog {
    async fn challenges_for(
        &self,
        subject: Subject,
        count: usize,
    ) -> Result<Vec<Challenge>, ContentError> {
        self.simulate_latency().await;
        let pool: Vec<Challenge> = self
            .challenges
            .iter()
            .filter(|challenge| challenge.subject() == subject)
            .cloned()
            .collect();
        let picked = sample(&pool, count);
        debug!(subject = %subject, requested = count, returned = picked.len(), "served challenges");
        Ok(picked)
    }
}

#[async_trait]
impl MiniGameSource for StaticCatalog {
    async fn monster_math_problems(&self) -> Result<Vec<Challenge>, ContentError> {
        self.simulate_latency().await;
        Ok(self.battle_problems.clone())
    }

    async fn number_maze(&self) -> Result<Maze, ContentError> {
        self.simulate_latency().await;
        if self.mazes.is_empty() {
            return Err(ContentError::NotFound);
        }
        let index = rng().random_range(0..self.mazes.len());
        Ok(self.mazes[index].clone())
    }

    async fn math_puzzles(&self, count: usize) -> Result<Vec<Challenge>, ContentError> {
        self.simulate_latency().await;
        Ok(sample(&self.puzzles, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_embedded()
            .unwrap()
            .with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn embedded_seeds_load() {
        let catalog = catalog();
        assert!(catalog.challenge_count() > 0);
        assert!(!catalog.monster_math_problems().await.unwrap().is_empty());
        assert!(!catalog.math_puzzles(5).await.unwrap().is_empty());
        catalog.number_maze().await.unwrap();
    }

    #[tokio::test]
    async fn sampling_never_exceeds_request() {
        let catalog = catalog();
        let picked = catalog
            .challenges_for(Subject::Math, 3)
            .await
            .unwrap();
        assert!(picked.len() <= 3);
        for challenge in &picked {
            assert_eq!(challenge.subject(), Subject::Math);
        }
    }

    #[tokio::test]
    async fn oversized_request_returns_whole_pool() {
        let catalog = catalog();
        let everything = catalog
            .challenges_for(Subject::Reading, usize::MAX)
            .await
            .unwrap();
        let again = catalog
            .challenges_for(Subject::Reading, usize::MAX)
            .await
            .unwrap();
        assert_eq!(everything.len(), again.len());
    }

    #[tokio::test]
    async fn sampling_avoids_duplicates() {
        let catalog = catalog();
        let picked = catalog.math_puzzles(5).await.unwrap();
        let mut ids: Vec<_> = picked.iter().map(|p| p.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), picked.len());
    }

    #[tokio::test]
    async fn mazes_in_the_pool_reach_their_goal() {
        // Every seeded maze must be solvable: following the designated
        // next positions from start has to land on the end cell.
        let catalog = catalog();
        for _ in 0..8 {
            let maze = catalog.number_maze().await.unwrap();
            let last = maze
                .questions()
                .last()
                .map(|question| question.next_position())
                .unwrap();
            assert_eq!(last, maze.end());
            assert!(maze.questions()[0].next_position().in_bounds(maze.grid_size()));
        }
    }
}

use std::fmt;
use std::time::Duration;

use quest_core::model::Challenge;

use crate::error::SessionError;
use crate::scoring::{Attempt, ScoringPolicy};

/// Hit points the monster starts with.
pub const MONSTER_MAX_HP: u32 = 100;
/// Damage dealt per correct answer.
pub const HIT_DAMAGE: u32 = 20;
/// Per-problem answer window.
pub const PROBLEM_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Terminal result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The monster's HP reached zero.
    Victory,
    /// Problems ran out with the monster still standing.
    Defeat,
}

/// Outcome of one answered (or forfeited) problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRound {
    pub correct: bool,
    pub monster_hp: u32,
    pub score: u32,
    pub defeated: bool,
}

/// Arithmetic battle: answer to strike, run the monster's HP down
/// before the problems run out.
pub struct MonsterBattle {
    problems: Vec<Challenge>,
    current: usize,
    monster_hp: u32,
    score: u32,
    over: bool,
}

impl MonsterBattle {
    /// Create a battle over the given problems.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when no problems are provided.
    pub fn new(problems: Vec<Challenge>) -> Result<Self, SessionError> {
        if problems.is_empty() {
            return Err(SessionError::NoContent);
        }
        Ok(Self {
            problems,
            current: 0,
            monster_hp: MONSTER_MAX_HP,
            score: 0,
            over: false,
        })
    }

    #[must_use]
    pub fn monster_hp(&self) -> u32 {
        self.monster_hp
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Terminal outcome, once the battle is over.
    #[must_use]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if !self.over {
            return None;
        }
        Some(if self.monster_hp == 0 {
            BattleOutcome::Victory
        } else {
            BattleOutcome::Defeat
        })
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Challenge> {
        if self.over {
            return None;
        }
        self.problems.get(self.current)
    }

    /// Hint for the current problem, when the seed data carries one.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.current_problem().and_then(Challenge::hint)
    }

    /// 1-based number of the problem being shown.
    #[must_use]
    pub fn problem_number(&self) -> usize {
        self.current + 1
    }

    #[must_use]
    pub fn total_problems(&self) -> usize {
        self.problems.len()
    }

    /// Answer the current problem. A hit deals damage and scores; a miss
    /// just moves on to the next problem.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the battle is over.
    pub fn submit(&mut self, candidate: &str) -> Result<BattleRound, SessionError> {
        self.resolve(Attempt::answer(candidate))
    }

    /// The countdown ran out: forfeit the problem and move on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the battle is over.
    pub fn time_up(&mut self) -> Result<BattleRound, SessionError> {
        self.resolve(Attempt::TimedOut)
    }

    fn resolve(&mut self, attempt: Attempt) -> Result<BattleRound, SessionError> {
        if self.over {
            return Err(SessionError::Completed);
        }
        let Some(problem) = self.problems.get(self.current) else {
            return Err(SessionError::Completed);
        };

        let (correct, points) = ScoringPolicy::ItemReward.score(problem, &attempt);
        if correct {
            self.monster_hp = self.monster_hp.saturating_sub(HIT_DAMAGE);
            self.score = self.score.saturating_add(points);
            if self.monster_hp == 0 {
                self.over = true;
            }
        }

        if !self.over {
            self.current += 1;
            if self.current >= self.problems.len() {
                self.over = true;
            }
        }

        Ok(BattleRound {
            correct,
            monster_hp: self.monster_hp,
            score: self.score,
            defeated: self.monster_hp == 0,
        })
    }

    /// Start over with a fresh problem set; the old state is discarded
    /// wholesale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoContent` when the new set is empty.
    pub fn restart(&mut self, problems: Vec<Challenge>) -> Result<(), SessionError> {
        *self = Self::new(problems)?;
        Ok(())
    }
}

impl fmt::Debug for MonsterBattle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonsterBattle")
            .field("problems_len", &self.problems.len())
            .field("current", &self.current)
            .field("monster_hp", &self.monster_hp)
            .field("score", &self.score)
            .field("over", &self.over)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::model::{ChallengeId, SkillName, Subject};

    fn problem(id: u64) -> Challenge {
        Challenge::new(
            ChallengeId::new(id),
            Subject::Math,
            SkillName::new("arithmetic").unwrap(),
            1,
            format!("P{id}"),
            vec!["hit".to_string(), "miss".to_string()],
            "hit",
            Some("try the first one".to_string()),
            None,
            10,
        )
        .unwrap()
    }

    fn battle(count: u64) -> MonsterBattle {
        MonsterBattle::new((1..=count).map(problem).collect()).unwrap()
    }

    #[test]
    fn five_hits_defeat_the_monster() {
        let mut battle = battle(5);
        for _ in 0..4 {
            let round = battle.submit("hit").unwrap();
            assert!(round.correct);
            assert!(!round.defeated);
        }
        let last = battle.submit("hit").unwrap();
        assert!(last.defeated);
        assert_eq!(last.monster_hp, 0);
        assert_eq!(last.score, 50);
        assert_eq!(battle.outcome(), Some(BattleOutcome::Victory));
    }

    #[test]
    fn misses_advance_without_damage() {
        let mut battle = battle(2);
        let round = battle.submit("miss").unwrap();
        assert!(!round.correct);
        assert_eq!(round.monster_hp, MONSTER_MAX_HP);
        assert_eq!(battle.problem_number(), 2);
    }

    #[test]
    fn running_out_of_problems_is_a_defeat() {
        let mut battle = battle(2);
        battle.submit("hit").unwrap();
        battle.submit("miss").unwrap();
        assert!(battle.is_over());
        assert_eq!(battle.outcome(), Some(BattleOutcome::Defeat));
    }

    #[test]
    fn time_up_forfeits_the_problem() {
        let mut battle = battle(2);
        let round = battle.time_up().unwrap();
        assert!(!round.correct);
        assert_eq!(round.score, 0);
        assert_eq!(battle.problem_number(), 2);
    }

    #[test]
    fn finished_battle_rejects_further_answers() {
        let mut battle = battle(1);
        battle.submit("miss").unwrap();
        assert!(matches!(
            battle.submit("hit").unwrap_err(),
            SessionError::Completed
        ));
    }

    #[test]
    fn empty_problem_set_is_no_content() {
        assert!(matches!(
            MonsterBattle::new(Vec::new()).unwrap_err(),
            SessionError::NoContent
        ));
    }

    #[test]
    fn restart_resets_everything() {
        let mut battle = battle(1);
        battle.submit("hit").unwrap();
        battle.restart((1..=3).map(problem).collect()).unwrap();
        assert_eq!(battle.monster_hp(), MONSTER_MAX_HP);
        assert_eq!(battle.score(), 0);
        assert!(!battle.is_over());
        assert_eq!(battle.total_problems(), 3);
    }

    #[test]
    fn hint_comes_from_the_current_problem() {
        let battle = battle(1);
        assert_eq!(battle.hint(), Some("try the first one"));
    }
}

use std::time::Duration;

use content::repository::{ChallengeSource, MiniGameSource, ProgressStore};
use content::{InMemoryProgressStore, StaticCatalog};
use quest_core::model::{SkillName, Subject};
use quest_core::time::fixed_clock;

fn catalog() -> StaticCatalog {
    StaticCatalog::from_embedded()
        .unwrap()
        .with_latency(Duration::ZERO)
}

#[tokio::test]
async fn retrievals_are_independent_copies() {
    let catalog = catalog();

    let mut first = catalog.monster_math_problems().await.unwrap();
    let expected = first.len();
    // Hack away at the first retrieval. The pool must not notice.
    first.pop();
    first.clear();

    let second = catalog.monster_math_problems().await.unwrap();
    assert_eq!(second.len(), expected);
}

#[tokio::test]
async fn challenge_sampling_respects_subject_and_count() {
    let catalog = catalog();
    let picked = catalog.challenges_for(Subject::Reading, 2).await.unwrap();
    assert!(picked.len() <= 2);
    assert!(picked.iter().all(|c| c.subject() == Subject::Reading));
}

#[tokio::test]
async fn progress_store_round_trip() {
    let store = InMemoryProgressStore::from_embedded(fixed_clock())
        .unwrap()
        .with_latency(Duration::ZERO);

    let before = store.current().await.unwrap();
    let after = store.add_stars(13).await.unwrap();
    assert_eq!(after.total_stars(), before.total_stars() + 13);

    let skill = SkillName::new("subtraction").unwrap();
    let with_skill = store.add_mastered_skill(skill.clone()).await.unwrap();
    assert!(with_skill.has_mastered(&skill));

    let leveled = store.set_level(Subject::Reading, 2).await.unwrap();
    assert_eq!(leveled.level(Subject::Reading), 2);
}

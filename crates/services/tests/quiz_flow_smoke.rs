use std::sync::Arc;
use std::time::Duration;

use content::repository::ProgressStore;
use content::{InMemoryProgressStore, StaticCatalog};
use quest_core::model::{PerformanceTier, Subject};
use quest_core::time::fixed_clock;
use services::{Attempt, ChallengeFlow};

fn fixtures() -> (ChallengeFlow, Arc<InMemoryProgressStore>) {
    let catalog = Arc::new(
        StaticCatalog::from_embedded()
            .unwrap()
            .with_latency(Duration::ZERO),
    );
    let store = Arc::new(InMemoryProgressStore::empty(fixed_clock()).with_latency(Duration::ZERO));
    let flow = ChallengeFlow::new(fixed_clock(), catalog, store.clone());
    (flow, store)
}

#[tokio::test]
async fn perfect_run_awards_stars_to_progress() {
    let (flow, store) = fixtures();

    let mut session = flow.start(Subject::Math).await.unwrap();
    assert_eq!(session.total_challenges(), 5);

    let mut summary = None;
    while !session.is_complete() {
        let answer = session
            .current_challenge()
            .unwrap()
            .correct_answer()
            .to_string();
        let result = flow
            .answer_current(&mut session, Attempt::answer(answer))
            .await
            .unwrap();
        summary = result.summary;
    }

    let summary = summary.expect("summary on the completing answer");
    assert_eq!(summary.correct(), 5);
    assert_eq!(summary.accuracy(), 100);
    assert_eq!(summary.tier(), PerformanceTier::Perfect);
    assert_eq!(summary.stars_earned(), 15);

    let record = store.current().await.unwrap();
    assert_eq!(record.total_stars(), 15);
}

#[tokio::test]
async fn wrong_answers_still_earn_consolation_stars() {
    let (flow, store) = fixtures();

    let mut session = flow.start(Subject::Reading).await.unwrap();
    let total = session.total_challenges();
    while !session.is_complete() {
        flow.answer_current(&mut session, Attempt::answer("definitely wrong"))
            .await
            .unwrap();
    }

    let summary = session.build_summary().unwrap();
    assert_eq!(summary.correct(), 0);
    assert_eq!(summary.tier(), PerformanceTier::KeepPracticing);
    // One consolation star per attempt.
    assert_eq!(
        store.current().await.unwrap().total_stars(),
        u32::try_from(total).unwrap()
    );
}

#[tokio::test]
async fn post_completion_answers_are_discarded() {
    let (flow, _store) = fixtures();

    let mut session = flow.start(Subject::Math).await.unwrap();
    while !session.is_complete() {
        flow.answer_current(&mut session, Attempt::TimedOut)
            .await
            .unwrap();
    }

    let answered = session.answered_count();
    let err = flow
        .answer_current(&mut session, Attempt::answer("late"))
        .await
        .unwrap_err();
    assert!(matches!(err, services::SessionError::Completed));
    assert_eq!(session.answered_count(), answered);
}

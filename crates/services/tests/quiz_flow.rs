use std::sync::Arc;

use quiz_core::model::{CompletionTrigger, Difficulty, QuestionDraft, QuizSettings};
use quiz_core::time::fixed_now;
use services::{
    AppServices, AppShell, Authenticator, Clock, GuestAuthenticator, HistoryService,
    QuizLoopService, ResultsReport, Screen, TickOutcome,
};
use storage::repository::{InMemoryRepository, QuestionRepository};

fn draft(n: usize, correct: usize, category: &str) -> QuestionDraft {
    QuestionDraft {
        prompt: format!("Question {n}?"),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer: correct,
        explanation: format!("Explanation {n}"),
        category: category.into(),
        difficulty: Difficulty::Medium,
    }
}

async fn seeded_repo(count: usize) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    let drafts: Vec<_> = (0..count)
        .map(|n| draft(n, n % 4, "Science").validate(fixed_now()).unwrap())
        .collect();
    repo.insert_questions(&drafts).await.unwrap();
    repo
}

#[tokio::test]
async fn manual_quiz_is_recorded_in_history() {
    let repo = seeded_repo(10).await;
    let loop_svc = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let mut run = loop_svc.start_quiz().await.unwrap();
    assert!(run.is_counting_down());

    // Answer the first three correctly and leave the rest blank.
    for n in 0..3 {
        let correct = run.session().current_question().correct_answer();
        run.select_answer(correct).unwrap();
        assert!(run.advance());
        assert_eq!(run.session().current_index(), n + 1);
    }

    let result = run.submit().unwrap();
    assert_eq!(result.score, 3);
    assert_eq!(result.percentage(), 30);
    assert_eq!(result.trigger, CompletionTrigger::Manual);
    assert!(!run.is_counting_down());

    let session = run.finish();
    let report = ResultsReport::build(session.questions(), &result);
    assert_eq!(report.incorrect, 7);

    let record = loop_svc.record_attempt(&session).await.unwrap();
    assert_eq!(record.category(), "Science");
    assert_eq!(record.difficulty(), "medium");

    let history = HistoryService::new(Arc::new(repo));
    let overview = history.overview(50).await.unwrap();
    assert_eq!(overview.summary.total_attempts, 1);
    assert_eq!(overview.summary.best_score, 30);
    assert_eq!(overview.attempts[0].id, record.id());
}

#[tokio::test(start_paused = true)]
async fn countdown_times_out_and_scores_answers() {
    let repo = seeded_repo(6).await;
    let settings = QuizSettings::new(3, None, false).unwrap();
    let loop_svc = QuizLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo),
    )
    .with_settings(settings);

    let mut run = loop_svc.start_quiz().await.unwrap();
    let correct = run.session().current_question().correct_answer();
    run.select_answer(correct).unwrap();
    run.advance();
    let wrong = (run.session().current_question().correct_answer() + 1) % 4;
    run.select_answer(wrong).unwrap();

    let mut seen = Vec::new();
    let result = loop {
        match run.next_tick().await {
            Some(TickOutcome::Running { time_left_secs }) => seen.push(time_left_secs),
            Some(TickOutcome::TimedOut(result)) => break result,
            other => panic!("unexpected tick outcome: {other:?}"),
        }
    };

    assert_eq!(seen, vec![2, 1]);
    assert_eq!(result.trigger, CompletionTrigger::Timeout);
    assert_eq!(result.score, 1);
    assert!(run.next_tick().await.is_none());

    // Completion is idempotent: a late submit returns the timed-out result.
    assert_eq!(run.submit().unwrap(), result);
}

#[tokio::test]
async fn shell_drives_a_full_round() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), QuizSettings::default());

    let mut batch = services.question_batch();
    for n in 0..4 {
        batch.add(draft(n, 0, if n % 2 == 0 { "Math" } else { "Art" })).unwrap();
    }
    batch.save_all().await.unwrap();
    assert_eq!(services.question_count().await.unwrap(), 4);

    let mut shell = AppShell::new();
    let profile = GuestAuthenticator
        .sign_in("sam@example.com", "pw")
        .await
        .unwrap();
    shell.sign_in(profile).unwrap();
    shell.start_quiz().unwrap();

    let quiz_loop = services.quiz_loop();
    let mut run = quiz_loop.start_quiz().await.unwrap();
    for _ in 0..4 {
        run.select_answer(0).unwrap();
        run.advance();
    }
    let result = run.submit().unwrap();
    let session = run.finish();
    let record = quiz_loop.record_attempt(&session).await.unwrap();
    assert_eq!(record.category(), "Mixed");

    shell.complete_quiz(result).unwrap();
    assert_eq!(shell.screen(), Screen::Results);
    assert_eq!(shell.user().unwrap().stats.streak, 1);

    shell.view_history().unwrap();
    let overview = services.history().overview(10).await.unwrap();
    assert_eq!(overview.summary.average_score, 100);
}

use tokio::sync::mpsc;
use tracing::info;

use quiz_core::model::CompletionResult;

use super::countdown::{Countdown, Tick};
use super::session::{QuizSession, TickOutcome};
use crate::Clock;
use crate::error::SessionError;

/// A started quiz session paired with its countdown.
///
/// The countdown is cancelled on every exit path: manual submission,
/// timeout, and dropping the run (navigating away or abandoning).
#[derive(Debug)]
pub struct QuizRun {
    session: QuizSession,
    countdown: Option<Countdown>,
    ticks: mpsc::Receiver<Tick>,
    clock: Clock,
}

impl QuizRun {
    /// Start `session` and its once-per-second countdown.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` if the session is not idle.
    pub fn start(mut session: QuizSession, clock: Clock) -> Result<Self, SessionError> {
        session.start(clock.now())?;
        let (countdown, ticks) = Countdown::every_second();
        Ok(Self {
            session,
            countdown: Some(countdown),
            ticks,
            clock,
        })
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// True while ticks are still scheduled.
    #[must_use]
    pub fn is_counting_down(&self) -> bool {
        self.countdown.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// Record `option` for the current question.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::select_answer`].
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.session.select_answer(option)
    }

    pub fn advance(&mut self) -> bool {
        self.session.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.session.retreat()
    }

    /// Point at question `index`.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::jump_to`].
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.jump_to(index)
    }

    /// Submit the quiz and stop the countdown.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::submit`]. On error the countdown keeps running.
    pub fn submit(&mut self) -> Result<CompletionResult, SessionError> {
        let result = self.session.submit(self.clock.now())?;
        self.stop_countdown();
        Ok(result)
    }

    /// Wait for the next countdown tick and apply it.
    ///
    /// Returns `None` once the countdown has been cancelled. Cancel-safe, so
    /// it can race other input in `tokio::select!`.
    pub async fn next_tick(&mut self) -> Option<TickOutcome> {
        self.countdown.as_ref()?;
        self.ticks.recv().await?;

        let outcome = self.session.tick(self.clock.now());
        if let TickOutcome::TimedOut(result) = &outcome {
            info!(score = result.score, "quiz timed out");
            self.stop_countdown();
        }
        Some(outcome)
    }

    /// Stop the countdown and hand back the session, completed or not.
    #[must_use]
    pub fn finish(mut self) -> QuizSession {
        self.stop_countdown();
        self.session
    }

    fn stop_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CompletionTrigger, Difficulty, Question, QuestionDraft, QuestionId};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn questions(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| {
                QuestionDraft {
                    prompt: format!("Q{id}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: 0,
                    explanation: String::new(),
                    category: "General".into(),
                    difficulty: Difficulty::Easy,
                }
                .validate(fixed_now())
                .unwrap()
                .assign_id(QuestionId::new(id))
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_drives_timeout_and_stops() {
        let session = QuizSession::new(questions(3), 3).unwrap();
        let mut run = QuizRun::start(session, fixed_clock()).unwrap();
        run.select_answer(0).unwrap();

        assert_eq!(
            run.next_tick().await,
            Some(TickOutcome::Running { time_left_secs: 2 })
        );
        assert_eq!(
            run.next_tick().await,
            Some(TickOutcome::Running { time_left_secs: 1 })
        );
        let Some(TickOutcome::TimedOut(result)) = run.next_tick().await else {
            panic!("expected timeout");
        };
        assert_eq!(result.score, 1);
        assert_eq!(result.trigger, CompletionTrigger::Timeout);

        assert!(!run.is_counting_down());
        assert_eq!(run.next_tick().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_cancels_countdown() {
        let session = QuizSession::new(questions(2), 900).unwrap();
        let mut run = QuizRun::start(session, fixed_clock()).unwrap();

        assert_eq!(run.submit(), Err(SessionError::NothingAnswered));
        assert!(run.is_counting_down());

        run.select_answer(1).unwrap();
        let result = run.submit().unwrap();
        assert_eq!(result.score, 0);
        assert!(!run.is_counting_down());
        assert_eq!(run.next_tick().await, None);

        // a second submission hands back the same result
        assert_eq!(run.submit().unwrap(), result);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_returns_session_without_completing() {
        let session = QuizSession::new(questions(2), 900).unwrap();
        let mut run = QuizRun::start(session, fixed_clock()).unwrap();
        run.advance();

        let session = run.finish();
        assert!(!session.is_complete());
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test]
    async fn start_rejects_running_session() {
        let session = QuizSession::begin(questions(1), 900, fixed_now()).unwrap();
        let err = QuizRun::start(session, fixed_clock()).unwrap_err();
        assert_eq!(err, SessionError::AlreadyStarted);
    }
}

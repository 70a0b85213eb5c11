use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

use quiz_core::model::{AnswerSet, CompletionResult, CompletionTrigger, Question};
use quiz_core::time::elapsed_secs;

use super::progress::{QuestionStatus, SessionProgress};
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session: `Idle → InProgress → Completed`, one way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    InProgress,
    Completed,
}

/// What a single countdown tick did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was deducted; the quiz is still running.
    Running { time_left_secs: u32 },
    /// The countdown ran out and the session completed on this tick.
    TimedOut(CompletionResult),
    /// The session is idle or already completed; nothing changed.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one timed quiz attempt.
///
/// Holds the question pointer, one answer slot per question and the
/// countdown. Timestamps are supplied by the caller so the services layer
/// clock stays the single time source. The session is driven from a single
/// control flow; it is not meant to be shared between tasks.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: AnswerSet,
    time_limit_secs: u32,
    time_left_secs: u32,
    started_at: Option<DateTime<Utc>>,
    result: Option<CompletionResult>,
}

impl QuizSession {
    /// Create an idle session over a fixed, ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided and
    /// `SessionError::InvalidTimeLimit` if the limit is zero.
    pub fn new(questions: Vec<Question>, time_limit_secs: u32) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        if time_limit_secs == 0 {
            return Err(SessionError::InvalidTimeLimit);
        }

        Ok(Self {
            answers: AnswerSet::unanswered(questions.len()),
            questions,
            current: 0,
            time_limit_secs,
            time_left_secs: time_limit_secs,
            started_at: None,
            result: None,
        })
    }

    /// Create a session and start it at `started_at`.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::new`].
    pub fn begin(
        questions: Vec<Question>,
        time_limit_secs: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(questions, time_limit_secs)?;
        session.start(started_at)?;
        Ok(session)
    }

    /// Start the clock. The start timestamp is captured once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` if the session left `Idle`.
    pub fn start(&mut self, started_at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.started_at.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        self.started_at = Some(started_at);
        debug!(
            questions = self.questions.len(),
            time_limit_secs = self.time_limit_secs,
            "quiz session started"
        );
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (self.started_at, &self.result) {
            (None, _) => SessionPhase::Idle,
            (Some(_), None) => SessionPhase::InProgress,
            (Some(_), Some(_)) => SessionPhase::Completed,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Selection recorded for the question under the pointer.
    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current)
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The completion result, once the session has completed.
    #[must_use]
    pub fn result(&self) -> Option<&CompletionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self.answers.answered_count();
        SessionProgress {
            current: self.current,
            total: self.questions.len(),
            answered,
            unanswered: self.questions.len() - answered,
            time_left_secs: self.time_left_secs,
            is_complete: self.is_complete(),
        }
    }

    /// Status of every question, in order, for the question navigator.
    #[must_use]
    pub fn question_map(&self) -> Vec<QuestionStatus> {
        (0..self.questions.len())
            .map(|i| {
                if i == self.current {
                    QuestionStatus::Current
                } else if self.answers.is_answered(i) {
                    QuestionStatus::Answered
                } else {
                    QuestionStatus::Unanswered
                }
            })
            .collect()
    }

    fn ensure_started(&self) -> Result<(), SessionError> {
        if self.started_at.is_none() {
            return Err(SessionError::NotStarted);
        }
        Ok(())
    }

    /// Record `option` for the current question. The last selection wins.
    ///
    /// Ignored once the session has completed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` for an idle session and
    /// `SessionError::OptionOutOfRange` if the question has no such option.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.ensure_started()?;
        if self.is_complete() {
            return Ok(());
        }

        let options = self.current_question().option_count();
        if option >= options {
            return Err(SessionError::OptionOutOfRange { option, options });
        }
        self.answers.set(self.current, option);
        Ok(())
    }

    /// Move to the next question. Returns false at the last question.
    pub fn advance(&mut self) -> bool {
        if self.phase() != SessionPhase::InProgress || self.current + 1 >= self.questions.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns false at the first question.
    pub fn retreat(&mut self) -> bool {
        if self.phase() != SessionPhase::InProgress || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Point at question `index` directly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` for an idle session and
    /// `SessionError::QuestionOutOfRange` if `index` is past the last question.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_started()?;
        let total = self.questions.len();
        if index >= total {
            return Err(SessionError::QuestionOutOfRange { index, total });
        }
        if !self.is_complete() {
            self.current = index;
        }
        Ok(())
    }

    /// Deduct one second. Reaching zero completes the session.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.phase() != SessionPhase::InProgress {
            return TickOutcome::Ignored;
        }

        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs > 0 {
            return TickOutcome::Running {
                time_left_secs: self.time_left_secs,
            };
        }

        TickOutcome::TimedOut(self.complete(now, CompletionTrigger::Timeout).clone())
    }

    /// Submit the quiz.
    ///
    /// Calling this on a completed session returns the stored result again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` for an idle session and
    /// `SessionError::NothingAnswered` if no question has been answered.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<CompletionResult, SessionError> {
        self.ensure_started()?;
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }
        if self.answers.answered_count() == 0 {
            return Err(SessionError::NothingAnswered);
        }
        Ok(self.complete(now, CompletionTrigger::Manual).clone())
    }

    fn complete(&mut self, now: DateTime<Utc>, trigger: CompletionTrigger) -> &CompletionResult {
        let started_at = self.started_at.unwrap_or(now);
        let score = self.answers.score_against(&self.questions);
        let total_questions = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let answers = self.answers.clone();

        self.result.get_or_insert_with(|| {
            let result = CompletionResult {
                score,
                answers,
                elapsed_secs: elapsed_secs(started_at, now),
                total_questions,
                trigger,
            };
            debug!(
                score = result.score,
                total = result.total_questions,
                elapsed_secs = result.elapsed_secs,
                ?trigger,
                "quiz session completed"
            );
            result
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("time_left_secs", &self.time_left_secs)
            .field("started_at", &self.started_at)
            .field("completed", &self.result.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{Difficulty, QuestionDraft, QuestionId};
    use quiz_core::time::fixed_now;

    fn build_question(id: u64, correct: usize) -> Question {
        QuestionDraft {
            prompt: format!("Question {id}"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: correct,
            explanation: String::new(),
            category: "General".into(),
            difficulty: Difficulty::Medium,
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    /// Ten questions whose correct option is `id % 4`.
    fn build_questions() -> Vec<Question> {
        (0..10).map(|i| build_question(i, (i % 4) as usize)).collect()
    }

    fn started(limit: u32) -> QuizSession {
        QuizSession::begin(build_questions(), limit, fixed_now()).unwrap()
    }

    #[test]
    fn initialize_sets_pointer_answers_and_quota() {
        let session = started(900);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers().len(), 10);
        assert_eq!(session.answers().answered_count(), 0);
        assert_eq!(session.time_left_secs(), 900);
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(
            QuizSession::new(Vec::new(), 900).unwrap_err(),
            SessionError::Empty
        );
        assert_eq!(
            QuizSession::new(build_questions(), 0).unwrap_err(),
            SessionError::InvalidTimeLimit
        );
    }

    #[test]
    fn idle_session_rejects_actions_until_started() {
        let mut session = QuizSession::new(build_questions(), 900).unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.select_answer(0), Err(SessionError::NotStarted));
        assert_eq!(session.jump_to(1), Err(SessionError::NotStarted));
        assert!(!session.advance());
        assert_eq!(session.tick(fixed_now()), TickOutcome::Ignored);
        assert_eq!(session.time_left_secs(), 900);

        session.start(fixed_now()).unwrap();
        assert_eq!(session.start(fixed_now()), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn select_answer_last_call_wins_without_advancing() {
        let mut session = started(900);
        session.select_answer(1).unwrap();
        session.select_answer(3).unwrap();
        assert_eq!(session.current_answer(), Some(3));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn out_of_range_option_is_rejected_without_mutation() {
        let mut session = started(900);
        session.select_answer(2).unwrap();

        let err = session.select_answer(7).unwrap_err();
        assert_eq!(
            err,
            SessionError::OptionOutOfRange {
                option: 7,
                options: 4
            }
        );
        assert_eq!(session.current_answer(), Some(2));
        assert_eq!(session.answers().answered_count(), 1);
    }

    #[test]
    fn navigation_is_clamped_at_both_ends() {
        let mut session = started(900);
        assert!(!session.retreat());
        assert_eq!(session.current_index(), 0);

        for _ in 0..9 {
            assert!(session.advance());
        }
        assert_eq!(session.current_index(), 9);
        assert!(!session.advance());
        assert_eq!(session.current_index(), 9);
        assert!(session.retreat());
        assert_eq!(session.current_index(), 8);
    }

    #[test]
    fn jump_to_validates_index() {
        let mut session = started(900);
        session.jump_to(6).unwrap();
        assert_eq!(session.current_index(), 6);
        assert_eq!(
            session.jump_to(10),
            Err(SessionError::QuestionOutOfRange {
                index: 10,
                total: 10
            })
        );
        assert_eq!(session.current_index(), 6);
    }

    #[test]
    fn navigation_preserves_selected_answers() {
        let mut session = started(900);
        for i in 0..10 {
            session.jump_to(i).unwrap();
            session.select_answer(3 - (i % 4)).unwrap();
        }
        for i in 0..10 {
            session.jump_to((i + 5) % 10).unwrap();
            session.jump_to(i).unwrap();
            assert_eq!(session.current_answer(), Some(3 - (i % 4)));
        }
    }

    #[test]
    fn manual_submit_scores_three_of_ten() {
        let mut session = started(900);
        for i in 0..3 {
            session.jump_to(i).unwrap();
            session.select_answer(i % 4).unwrap();
        }

        let result = session
            .submit(fixed_now() + Duration::seconds(75))
            .unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(result.percentage(), 30);
        assert_eq!(result.total_questions, 10);
        assert_eq!(result.elapsed_secs, 75);
        assert_eq!(result.trigger, CompletionTrigger::Manual);
        assert_eq!(result.answers.answered_count(), 3);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn submit_without_answers_is_rejected() {
        let mut session = started(900);
        assert_eq!(
            session.submit(fixed_now()),
            Err(SessionError::NothingAnswered)
        );
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn countdown_exhaustion_completes_with_same_shape() {
        let mut session = started(5);
        // four answered, two of them correct
        let picks = [(0, 0), (1, 1), (2, 0), (3, 0)];
        for (index, option) in picks {
            session.jump_to(index).unwrap();
            session.select_answer(option).unwrap();
        }

        let mut now = fixed_now();
        for remaining in (1..5).rev() {
            now += Duration::seconds(1);
            assert_eq!(
                session.tick(now),
                TickOutcome::Running {
                    time_left_secs: remaining
                }
            );
        }
        now += Duration::seconds(1);
        let TickOutcome::TimedOut(result) = session.tick(now) else {
            panic!("expected timeout");
        };

        assert_eq!(result.score, 2);
        assert_eq!(result.trigger, CompletionTrigger::Timeout);
        assert_eq!(result.elapsed_secs, 5);
        assert_eq!(session.time_left_secs(), 0);
        assert_eq!(session.result(), Some(&result));
    }

    #[test]
    fn elapsed_time_follows_wall_clock_not_countdown() {
        let mut session = started(900);
        session.select_answer(0).unwrap();
        session.tick(fixed_now() + Duration::seconds(1));

        // process suspended: only one tick observed but ten minutes passed
        let result = session.submit(fixed_now() + Duration::minutes(10)).unwrap();
        assert_eq!(result.elapsed_secs, 600);
        assert_eq!(session.time_left_secs(), 899);
    }

    #[test]
    fn completion_is_idempotent() {
        let mut session = started(900);
        session.select_answer(0).unwrap();
        let first = session.submit(fixed_now() + Duration::seconds(30)).unwrap();

        // a late tick and a second submit must not recompute anything
        assert_eq!(
            session.tick(fixed_now() + Duration::seconds(31)),
            TickOutcome::Ignored
        );
        let second = session.submit(fixed_now() + Duration::seconds(90)).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.time_left_secs(), 900);
    }

    #[test]
    fn completed_session_ignores_selection_and_navigation() {
        let mut session = started(900);
        session.select_answer(0).unwrap();
        session.submit(fixed_now()).unwrap();

        session.select_answer(2).unwrap();
        assert_eq!(session.current_answer(), Some(0));
        assert!(!session.advance());
        session.jump_to(4).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.result().unwrap().answers.get(0), Some(0));
    }

    #[test]
    fn progress_and_question_map_track_answers() {
        let mut session = started(900);
        session.select_answer(1).unwrap();
        session.jump_to(2).unwrap();

        let progress = session.progress();
        assert_eq!(progress.current, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.unanswered, 9);
        assert_eq!(progress.percent_through(), 30);
        assert!(!progress.is_complete);

        let map = session.question_map();
        assert_eq!(map[0], QuestionStatus::Answered);
        assert_eq!(map[1], QuestionStatus::Unanswered);
        assert_eq!(map[2], QuestionStatus::Current);
    }
}

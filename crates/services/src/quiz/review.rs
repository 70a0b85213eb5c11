use quiz_core::model::{CompletionResult, Performance, Question, QuestionId};

/// Per-question row of the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub correct: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Presentation-agnostic results of a finished quiz.
///
/// No pre-formatted strings; the front end decides how to render times and bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsReport {
    pub score: u32,
    pub total: u32,
    pub incorrect: u32,
    pub percentage: u32,
    pub performance: Performance,
    pub elapsed_secs: u64,
    pub items: Vec<QuestionReview>,
}

impl ResultsReport {
    /// Pair each question with the recorded answer at the same position.
    #[must_use]
    pub fn build(questions: &[Question], result: &CompletionResult) -> Self {
        let items = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = result.answers.get(index);
                QuestionReview {
                    question_id: question.id(),
                    prompt: question.prompt().to_string(),
                    options: question.options().to_vec(),
                    selected,
                    correct: question.correct_answer(),
                    is_correct: question.is_correct(selected),
                    explanation: question.explanation().to_string(),
                }
            })
            .collect();

        Self {
            score: result.score,
            total: result.total_questions,
            incorrect: result.incorrect(),
            percentage: result.percentage(),
            performance: result.performance(),
            elapsed_secs: result.elapsed_secs,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizSession;
    use chrono::Duration;
    use quiz_core::model::{Difficulty, QuestionDraft};
    use quiz_core::time::fixed_now;

    fn question(id: u64, correct: usize) -> Question {
        QuestionDraft {
            prompt: format!("Q{id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: correct,
            explanation: format!("because {id}"),
            category: "General".into(),
            difficulty: Difficulty::Hard,
        }
        .validate(fixed_now())
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    #[test]
    fn report_marks_each_question() {
        let questions = vec![question(1, 0), question(2, 1), question(3, 2), question(4, 3)];
        let mut session = QuizSession::begin(questions.clone(), 900, fixed_now()).unwrap();
        session.select_answer(0).unwrap();
        session.advance();
        session.select_answer(2).unwrap();
        session.advance();
        session.select_answer(2).unwrap();
        let result = session.submit(fixed_now() + Duration::seconds(42)).unwrap();

        let report = ResultsReport::build(&questions, &result);
        assert_eq!(report.score, 2);
        assert_eq!(report.incorrect, 2);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.performance, Performance::Poor);
        assert_eq!(report.elapsed_secs, 42);

        let marks: Vec<_> = report.items.iter().map(|i| i.is_correct).collect();
        assert_eq!(marks, vec![true, false, true, false]);
        assert_eq!(report.items[1].selected, Some(2));
        assert_eq!(report.items[1].correct, 1);
        assert_eq!(report.items[3].selected, None);
        assert_eq!(report.items[3].explanation, "because 4");
    }
}

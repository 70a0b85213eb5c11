mod countdown;
mod progress;
mod review;
mod run;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::SessionError;
pub use countdown::{Countdown, Tick};
pub use progress::{QuestionStatus, SessionProgress};
pub use review::{QuestionReview, ResultsReport};
pub use run::QuizRun;
pub use session::{QuizSession, SessionPhase, TickOutcome};
pub use workflow::{QuizLoopService, attempt_labels};

//! Top-level screen state for a quiz front end.
//!
//! The shell owns which screen is showing, the signed-in user and the most
//! recent result. Feedback for the user is queued as `Notice`s that the
//! front end drains after each transition.

use std::collections::VecDeque;

use quiz_core::model::{CompletionResult, CompletionTrigger, Performance, UserProfile};

use crate::error::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Auth,
    Dashboard,
    Quiz,
    Results,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    fn new(title: impl Into<String>, description: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppShell {
    screen: Screen,
    user: Option<UserProfile>,
    last_result: Option<CompletionResult>,
    notices: VecDeque<Notice>,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Auth,
            user: None,
            last_result: None,
            notices: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&CompletionResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Queue feedback produced outside the shell's own transitions.
    pub fn notify(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        level: NoticeLevel,
    ) {
        self.push(Notice::new(title, description, level));
    }

    /// Queue an error raised outside the shell, e.g. a failed save.
    pub fn report_error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.notify(title, description, NoticeLevel::Error);
    }

    /// # Errors
    ///
    /// Returns `ShellError::InvalidTransition` unless the shell is on `Auth`.
    pub fn sign_in(&mut self, profile: UserProfile) -> Result<(), ShellError> {
        self.require_screen(&[Screen::Auth], "sign in")?;
        let description = format!("Signed in as {}", profile.name);
        self.user = Some(profile);
        self.screen = Screen::Dashboard;
        self.push(Notice::new("Welcome back!", description, NoticeLevel::Success));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ShellError::InvalidTransition` unless the shell is on `Auth`.
    pub fn sign_up(&mut self, profile: UserProfile) -> Result<(), ShellError> {
        self.require_screen(&[Screen::Auth], "sign up")?;
        let description = format!("Welcome, {}!", profile.name);
        self.user = Some(profile);
        self.screen = Screen::Dashboard;
        self.push(Notice::new("Account created", description, NoticeLevel::Success));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ShellError::NotSignedIn` when nobody is signed in.
    pub fn sign_out(&mut self) -> Result<(), ShellError> {
        self.signed_in()?;
        self.user = None;
        self.last_result = None;
        self.screen = Screen::Auth;
        self.push(Notice::new(
            "Signed out",
            "You have been signed out",
            NoticeLevel::Info,
        ));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ShellError` unless a signed-in user is on the dashboard.
    pub fn start_quiz(&mut self) -> Result<(), ShellError> {
        self.signed_in()?;
        self.require_screen(&[Screen::Dashboard], "start a quiz")?;
        self.screen = Screen::Quiz;
        self.push(Notice::new("Quiz started", "Good luck!", NoticeLevel::Info));
        Ok(())
    }

    /// Show results for `result` and fold it into the user's stats.
    ///
    /// # Errors
    ///
    /// Returns `ShellError` unless a quiz is in progress.
    pub fn complete_quiz(&mut self, result: CompletionResult) -> Result<(), ShellError> {
        self.signed_in()?;
        self.require_screen(&[Screen::Quiz], "complete a quiz")?;

        if let Some(user) = self.user.as_mut() {
            user.stats.record(&result);
        }

        let title = match result.trigger {
            CompletionTrigger::Timeout => "Time's up!",
            CompletionTrigger::Manual => "Quiz completed!",
        };
        let level = if result.performance() >= Performance::Good {
            NoticeLevel::Success
        } else {
            NoticeLevel::Info
        };
        let description = format!(
            "You scored {} out of {}",
            result.score, result.total_questions
        );

        self.last_result = Some(result);
        self.screen = Screen::Results;
        self.push(Notice::new(title, description, level));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ShellError` unless the results screen is showing.
    pub fn retake(&mut self) -> Result<(), ShellError> {
        self.signed_in()?;
        self.require_screen(&[Screen::Results], "retake the quiz")?;
        self.last_result = None;
        self.screen = Screen::Quiz;
        self.push(Notice::new("Quiz started", "Good luck!", NoticeLevel::Info));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ShellError` unless the dashboard or results screen is showing.
    pub fn view_history(&mut self) -> Result<(), ShellError> {
        self.signed_in()?;
        self.require_screen(&[Screen::Dashboard, Screen::Results], "view history")?;
        self.screen = Screen::History;
        Ok(())
    }

    /// Leaving an unfinished quiz discards it.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::NotSignedIn` when nobody is signed in.
    pub fn back_to_dashboard(&mut self) -> Result<(), ShellError> {
        self.signed_in()?;
        if self.screen == Screen::Quiz {
            self.push(Notice::new(
                "Quiz abandoned",
                "Your answers were not saved",
                NoticeLevel::Warning,
            ));
        }
        self.screen = Screen::Dashboard;
        Ok(())
    }

    fn signed_in(&self) -> Result<(), ShellError> {
        if self.user.is_some() {
            Ok(())
        } else {
            Err(ShellError::NotSignedIn)
        }
    }

    fn require_screen(&self, allowed: &[Screen], action: &'static str) -> Result<(), ShellError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(ShellError::InvalidTransition {
                from: self.screen,
                action,
            })
        }
    }

    fn push(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

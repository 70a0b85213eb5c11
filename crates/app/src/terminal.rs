use std::io::Write;

use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, warn};

use quiz_core::model::option_label;
use quiz_core::time::{format_countdown, format_duration};
use services::{
    AppServices, AppShell, Authenticator, GuestAuthenticator, HistoryOverview, Notice,
    NoticeLevel, QuestionStatus, QuizRun, QuizSession, ResultsReport, Screen, ShellError,
    TickOutcome,
};

use crate::admin;

/// Attempts shown by the history screen.
pub const HISTORY_LIMIT: u32 = 50;

/// The guest authenticator only checks that a password is present.
const GUEST_PASSWORD: &str = "guest";

/// One line of quiz input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Select(usize),
    Next,
    Previous,
    Jump(usize),
    Map,
    Submit,
    Quit,
    Help,
}

impl Input {
    /// Parse a trimmed input line. Question numbers are 1-based.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        let mut parts = line.split_whitespace();
        let head = parts.next()?;
        let input = match head {
            "a" | "b" | "c" | "d" => {
                let option = usize::from(head.as_bytes()[0] - b'a');
                Self::Select(option)
            }
            "n" | "next" => Self::Next,
            "p" | "prev" => Self::Previous,
            "g" | "go" => {
                let number: usize = parts.next()?.parse().ok()?;
                Self::Jump(number.checked_sub(1)?)
            }
            "m" | "map" => Self::Map,
            "s" | "submit" => Self::Submit,
            "q" | "quit" => Self::Quit,
            "?" | "h" | "help" => Self::Help,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(input)
    }
}

const HELP: &str =
    "a-d: choose answer | n: next | p: previous | g <n>: go to question | m: map | s: submit | q: quit";

const MENU_HELP: &str = "quiz (s) | retake (r) | history (h) | admin (a) | back (d) | in <email> | up <email> <name> | out | exit (x)";

/// One line typed at the app menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuInput {
    SignIn(String),
    SignUp { email: String, name: String },
    SignOut,
    Quiz,
    Retake,
    History,
    Admin,
    Back,
    Exit,
    Help,
}

impl MenuInput {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next()?.to_ascii_lowercase();
        let input = match head.as_str() {
            "in" | "signin" => Self::SignIn(parts.next()?.to_string()),
            "up" | "signup" => {
                let email = parts.next()?.to_string();
                let name = parts.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return None;
                }
                return Some(Self::SignUp { email, name });
            }
            "out" | "signout" => Self::SignOut,
            "s" | "quiz" | "start" => Self::Quiz,
            "r" | "retake" => Self::Retake,
            "h" | "history" => Self::History,
            "a" | "admin" => Self::Admin,
            "d" | "back" | "dashboard" => Self::Back,
            "x" | "exit" => Self::Exit,
            "?" | "help" => Self::Help,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(input)
    }
}

fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Auth => "auth",
        Screen::Dashboard => "dashboard",
        Screen::Quiz => "quiz",
        Screen::Results => "results",
        Screen::History => "history",
    }
}

/// Sign `email` in as a guest, reporting a refusal as a notice.
pub async fn sign_in_guest(shell: &mut AppShell, email: &str) -> Result<(), ShellError> {
    match GuestAuthenticator.sign_in(email, GUEST_PASSWORD).await {
        Ok(profile) => shell.sign_in(profile),
        Err(err) => {
            shell.report_error("Sign in failed", err.to_string());
            Ok(())
        }
    }
}

/// Drive the app menu until `exit` or end of input.
///
/// Every screen change goes through `shell`; refused transitions become notices.
pub async fn run_app<R>(
    services: &AppServices,
    shell: &mut AppShell,
    email: &str,
    lines: &mut Lines<R>,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    sign_in_guest(shell, email).await?;
    print_notices(shell);
    println!("{MENU_HELP}");

    loop {
        print!("{}> ", screen_label(shell.screen()));
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            debug!("stdin closed");
            break;
        };
        let Some(input) = MenuInput::parse(&line) else {
            if !line.trim().is_empty() {
                println!("? {MENU_HELP}");
            }
            continue;
        };

        let outcome = match input {
            MenuInput::Exit => break,
            MenuInput::Help => {
                println!("{MENU_HELP}");
                Ok(true)
            }
            MenuInput::SignIn(email) => sign_in_guest(shell, &email).await.map(|()| true),
            MenuInput::SignUp { email, name } => {
                match GuestAuthenticator.sign_up(&name, &email, GUEST_PASSWORD).await {
                    Ok(profile) => shell.sign_up(profile).map(|()| true),
                    Err(err) => {
                        shell.report_error("Sign up failed", err.to_string());
                        Ok(true)
                    }
                }
            }
            MenuInput::SignOut => shell.sign_out().map(|()| true),
            MenuInput::Back => shell.back_to_dashboard().map(|()| true),
            MenuInput::Quiz => match shell.start_quiz() {
                Ok(()) => Ok(play(services, shell, lines).await?),
                Err(err) => Err(err),
            },
            MenuInput::Retake => match shell.retake() {
                Ok(()) => Ok(play(services, shell, lines).await?),
                Err(err) => Err(err),
            },
            MenuInput::History => match shell.view_history() {
                Ok(()) => {
                    match services.history().overview(HISTORY_LIMIT).await {
                        Ok(overview) => print_history(&overview),
                        Err(err) => shell.report_error("Could not load history", err.to_string()),
                    }
                    Ok(true)
                }
                Err(err) => Err(err),
            },
            MenuInput::Admin => match shell.user() {
                Some(_) => {
                    let mut batch = services.question_batch();
                    admin::run_admin(&mut batch, shell, lines).await?;
                    Ok(true)
                }
                None => Err(ShellError::NotSignedIn),
            },
        };

        let input_open = match outcome {
            Ok(open) => open,
            Err(err) => {
                shell.report_error("Not available", err.to_string());
                true
            }
        };
        print_notices(shell);
        if !input_open {
            break;
        }
    }
    Ok(())
}

/// Run one quiz on a shell already showing `Screen::Quiz`.
///
/// Returns `false` once input has ended.
async fn play<R>(
    services: &AppServices,
    shell: &mut AppShell,
    lines: &mut Lines<R>,
) -> Result<bool, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
{
    print_notices(shell);
    let quiz_loop = services.quiz_loop();
    let mut run = match quiz_loop.start_quiz().await {
        Ok(run) => run,
        Err(err) => {
            shell.report_error("Could not start quiz", err.to_string());
            shell.back_to_dashboard()?;
            return Ok(true);
        }
    };
    println!("{HELP}");
    print_question(run.session());

    let mut input_open = true;
    let result = loop {
        tokio::select! {
            tick = run.next_tick(), if run.is_counting_down() => match tick {
                Some(TickOutcome::TimedOut(result)) => {
                    println!();
                    break Some(result);
                }
                Some(TickOutcome::Running { time_left_secs }) => {
                    if time_left_secs % 60 == 0 || time_left_secs <= 10 {
                        println!("  [{} left]", format_countdown(u64::from(time_left_secs)));
                    }
                }
                Some(TickOutcome::Ignored) | None => {}
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed mid-quiz");
                    input_open = false;
                    break None;
                };
                match Input::parse(&line) {
                    Some(Input::Quit) => break None,
                    Some(Input::Submit) => match run.submit() {
                        Ok(result) => break Some(result),
                        Err(err) => println!("! {err}"),
                    },
                    Some(input) => apply(&mut run, input),
                    None => println!("? {HELP}"),
                }
            }
        }
    };

    let session = run.finish();
    let Some(result) = result else {
        shell.back_to_dashboard()?;
        return Ok(input_open);
    };

    match quiz_loop.record_attempt(&session).await {
        Ok(record) => debug!(attempt = %record.id(), "attempt saved"),
        Err(err) => {
            warn!(error = %err, "failed to save attempt");
            shell.report_error("Could not save attempt", err.to_string());
        }
    }

    print_results(&ResultsReport::build(session.questions(), &result));
    shell.complete_quiz(result)?;
    if let Some(user) = shell.user() {
        let stats = &user.stats;
        println!(
            "Streak: {} | Overall: {}% | {} correct, {} incorrect",
            stats.streak,
            stats.average_score,
            stats.correct_answers,
            stats.incorrect_answers()
        );
    }
    Ok(input_open)
}

fn apply(run: &mut QuizRun, input: Input) {
    let outcome = match input {
        Input::Select(option) => run.select_answer(option),
        Input::Next => {
            if !run.advance() {
                println!("! already at the last question");
            }
            Ok(())
        }
        Input::Previous => {
            if !run.retreat() {
                println!("! already at the first question");
            }
            Ok(())
        }
        Input::Jump(index) => run.jump_to(index),
        Input::Map => {
            print_map(run.session());
            return;
        }
        Input::Help => {
            println!("{HELP}");
            return;
        }
        Input::Submit | Input::Quit => return,
    };

    match outcome {
        Ok(()) => print_question(run.session()),
        Err(err) => println!("! {err}"),
    }
}

fn print_question(session: &QuizSession) {
    let progress = session.progress();
    let question = session.current_question();
    println!();
    println!(
        "Question {} of {}  [{} | {}]  {} answered, {} left",
        progress.current + 1,
        progress.total,
        question.category(),
        question.difficulty(),
        progress.answered,
        format_countdown(u64::from(progress.time_left_secs)),
    );
    println!("{}", question.prompt());
    for (index, option) in question.options().iter().enumerate() {
        let marker = if session.current_answer() == Some(index) {
            '*'
        } else {
            ' '
        };
        println!(" {marker} {}. {option}", option_label(index));
    }
}

fn print_map(session: &QuizSession) {
    let cells: Vec<String> = session
        .question_map()
        .iter()
        .enumerate()
        .map(|(index, status)| match status {
            QuestionStatus::Current => format!("[{}]", index + 1),
            QuestionStatus::Answered => format!(" {}*", index + 1),
            QuestionStatus::Unanswered => format!(" {} ", index + 1),
        })
        .collect();
    println!("{}", cells.join(" "));
}

fn print_results(report: &ResultsReport) {
    println!();
    println!(
        "Score: {}/{} ({}%) - {}",
        report.score, report.total, report.percentage, report.performance
    );
    println!(
        "Correct: {}  Incorrect: {}  Time: {}",
        report.score,
        report.incorrect,
        format_countdown(report.elapsed_secs)
    );
    for (index, item) in report.items.iter().enumerate() {
        let mark = if item.is_correct { "ok" } else { "x " };
        let selected = item
            .selected
            .map_or_else(|| "-".to_string(), |s| option_label(s).to_string());
        println!(
            "{mark} {}. {} (yours: {selected}, correct: {})",
            index + 1,
            item.prompt,
            option_label(item.correct)
        );
        if !item.is_correct {
            println!("     {}", item.explanation);
        }
    }
}

pub fn print_history(overview: &HistoryOverview) {
    let summary = &overview.summary;
    println!(
        "Attempts: {}  Average: {}%  Best: {}%  Time spent: {}",
        summary.total_attempts,
        summary.average_score,
        summary.best_score,
        format_duration(summary.total_time_secs)
    );
    if overview.attempts.is_empty() {
        println!("No quiz attempts yet.");
        return;
    }
    for item in &overview.attempts {
        println!(
            "{}  {:>2}/{:<2} {:>3}%  {:>5}  {} / {}  {}",
            item.completed_at.format("%Y-%m-%d %H:%M"),
            item.score,
            item.total,
            item.percentage,
            format_countdown(item.time_spent_secs),
            item.category,
            item.difficulty,
            item.performance
        );
    }
}

pub fn print_notices(shell: &mut AppShell) {
    for Notice {
        title,
        description,
        level,
    } in shell.drain_notices()
    {
        let tag = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "done",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        println!("[{tag}] {title}: {description}");
    }
}

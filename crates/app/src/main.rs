use std::fmt;

use quiz_core::model::{DEFAULT_TIME_LIMIT_SECS, QuizSettings};
use services::{AppServices, AppShell, Clock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod admin;
mod samples;
mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeLimit { raw: String },
    InvalidQuestionLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeLimit { raw } => {
                write!(f, "invalid time limit (seconds > 0): {raw}")
            }
            ArgsError::InvalidQuestionLimit { raw } => {
                write!(f, "invalid question limit (> 0): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz    [--db <sqlite_url>] [--time-limit <secs>] [--limit <n>] [--shuffle] [--email <addr>]");
    eprintln!("  cargo run -p app -- admin   [--db <sqlite_url>] [--email <addr>]");
    eprintln!("  cargo run -p app -- seed    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- history [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --time-limit {DEFAULT_TIME_LIMIT_SECS}");
    eprintln!("  --email guest@localhost");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_TIME_LIMIT_SECS, QUIZ_QUESTION_LIMIT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Admin,
    Seed,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "admin" => Some(Self::Admin),
            "seed" => Some(Self::Seed),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    time_limit_secs: u32,
    question_limit: Option<u32>,
    shuffle: bool,
    email: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            db_url: normalize_sqlite_url("sqlite:quiz.sqlite3".into()),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            question_limit: None,
            shuffle: false,
            email: "guest@localhost".into(),
        }
    }
}

impl Args {
    /// Defaults overridden by `QUIZ_*` environment variables.
    fn from_env() -> Result<Self, ArgsError> {
        let mut args = Self::default();
        if let Ok(url) = std::env::var("QUIZ_DB_URL") {
            args.db_url = normalize_sqlite_url(url);
        }
        if let Ok(raw) = std::env::var("QUIZ_TIME_LIMIT_SECS") {
            args.time_limit_secs =
                parse_positive(&raw).ok_or(ArgsError::InvalidTimeLimit { raw })?;
        }
        if let Ok(raw) = std::env::var("QUIZ_QUESTION_LIMIT") {
            args.question_limit =
                Some(parse_positive(&raw).ok_or(ArgsError::InvalidQuestionLimit { raw })?);
        }
        Ok(args)
    }

    fn apply_flags(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                "--time-limit" => {
                    let value = require_value(args, "--time-limit")?;
                    self.time_limit_secs = parse_positive(&value)
                        .ok_or(ArgsError::InvalidTimeLimit { raw: value })?;
                }
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    self.question_limit = Some(
                        parse_positive(&value)
                            .ok_or(ArgsError::InvalidQuestionLimit { raw: value })?,
                    );
                }
                "--shuffle" => self.shuffle = true,
                "--email" => self.email = require_value(args, "--email")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn seed(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let existing = services.question_count().await?;
    if existing > 0 {
        println!("question bank already has {existing} questions; nothing to do");
        return Ok(());
    }

    let mut batch = services.question_batch();
    for draft in samples::sample_questions() {
        batch.add(draft)?;
    }
    let ids = batch.save_all().await?;
    println!("seeded {} questions", ids.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Without a subcommand, open the quiz menu.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|args| args.apply_flags(&mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    let settings = QuizSettings::new(
        parsed.time_limit_secs,
        parsed.question_limit,
        parsed.shuffle,
    )?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), settings).await?;
    info!(db = %parsed.db_url, command = ?cmd, "storage ready");

    match cmd {
        Command::Seed => seed(&services).await,
        Command::Quiz => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut shell = AppShell::new();
            terminal::run_app(&services, &mut shell, &parsed.email, &mut lines).await
        }
        Command::Admin => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut shell = AppShell::new();
            terminal::sign_in_guest(&mut shell, &parsed.email).await?;
            terminal::print_notices(&mut shell);
            let mut batch = services.question_batch();
            admin::run_admin(&mut batch, &mut shell, &mut lines).await?;
            Ok(())
        }
        Command::History => {
            let overview = services.history().overview(terminal::HISTORY_LIMIT).await?;
            terminal::print_history(&overview);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

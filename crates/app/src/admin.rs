//! Interactive question entry: stage drafts, review them, save them as one batch.

use std::io::Write;

use tokio::io::{AsyncBufRead, Lines};

use quiz_core::model::{Difficulty, OPTION_COUNT, QuestionDraft, option_label};
use services::{AppShell, NoticeLevel, QuestionBatch};

use crate::terminal::print_notices;

const HELP: &str = "add: new question | ls: list staged | rm <n>: remove | save: save all | done: leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminInput {
    Add,
    List,
    Remove(usize),
    Save,
    Done,
    Help,
}

impl AdminInput {
    /// Parse one admin command. Staged questions are numbered from 1.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        let mut parts = line.split_whitespace();
        let input = match parts.next()? {
            "add" | "a" => Self::Add,
            "ls" | "list" => Self::List,
            "rm" | "remove" => {
                let number: usize = parts.next()?.parse().ok()?;
                Self::Remove(number.checked_sub(1)?)
            }
            "save" => Self::Save,
            "done" | "q" | "quit" => Self::Done,
            "?" | "help" => Self::Help,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(input)
    }
}

/// Outcome of prompting for one question.
enum DraftEntry {
    Ready(QuestionDraft),
    Rejected(String),
    Closed,
}

/// Option index for a letter such as `b` or `B`.
fn option_index(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    Some(usize::from(letter as u8 - b'A'))
}

async fn ask<R>(lines: &mut Lines<R>, label: &str) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    print!("  {label}: ");
    std::io::stdout().flush()?;
    lines.next_line().await
}

async fn read_draft<R>(lines: &mut Lines<R>) -> std::io::Result<DraftEntry>
where
    R: AsyncBufRead + Unpin,
{
    let mut draft = QuestionDraft::blank();

    let Some(prompt) = ask(lines, "Question").await? else {
        return Ok(DraftEntry::Closed);
    };
    draft.prompt = prompt;

    for index in 0..OPTION_COUNT {
        let Some(text) = ask(lines, &format!("Option {}", option_label(index))).await? else {
            return Ok(DraftEntry::Closed);
        };
        draft.options[index] = text;
    }

    let Some(correct) = ask(lines, "Correct option (A-D)").await? else {
        return Ok(DraftEntry::Closed);
    };
    let Some(explanation) = ask(lines, "Explanation").await? else {
        return Ok(DraftEntry::Closed);
    };
    let Some(category) = ask(lines, "Category").await? else {
        return Ok(DraftEntry::Closed);
    };
    let Some(difficulty) = ask(lines, "Difficulty (easy/medium/hard)").await? else {
        return Ok(DraftEntry::Closed);
    };

    let Some(correct_answer) = option_index(&correct) else {
        return Ok(DraftEntry::Rejected(format!(
            "correct option must be a letter, got {:?}",
            correct.trim()
        )));
    };
    draft.correct_answer = correct_answer;
    draft.explanation = explanation;
    draft.category = category;
    if !difficulty.trim().is_empty() {
        match difficulty.parse::<Difficulty>() {
            Ok(parsed) => draft.difficulty = parsed,
            Err(err) => return Ok(DraftEntry::Rejected(err.to_string())),
        }
    }

    Ok(DraftEntry::Ready(draft))
}

fn print_staged(batch: &QuestionBatch) {
    if batch.is_empty() {
        println!("  nothing staged");
        return;
    }
    for (index, question) in batch.staged().iter().enumerate() {
        println!(
            "  {}. {} [{} | {}] answer {}",
            index + 1,
            question.prompt,
            question.category,
            question.difficulty,
            option_label(question.correct_answer)
        );
    }
}

/// Apply one command. Returns `false` once the user leaves or input ends.
///
/// Feedback goes to the shell's notice queue.
pub async fn handle<R>(
    input: AdminInput,
    batch: &mut QuestionBatch,
    shell: &mut AppShell,
    lines: &mut Lines<R>,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    match input {
        AdminInput::Add => match read_draft(lines).await? {
            DraftEntry::Ready(draft) => match batch.add(draft) {
                Ok(staged) => shell.notify(
                    "Question added",
                    format!("{staged} question(s) staged"),
                    NoticeLevel::Success,
                ),
                Err(err) => shell.report_error("Invalid question", err.to_string()),
            },
            DraftEntry::Rejected(message) => shell.report_error("Invalid question", message),
            DraftEntry::Closed => return Ok(false),
        },
        AdminInput::List => print_staged(batch),
        AdminInput::Remove(index) => match batch.remove(index) {
            Ok(removed) => shell.notify("Question removed", removed.prompt, NoticeLevel::Info),
            Err(err) => shell.report_error("Nothing removed", err.to_string()),
        },
        AdminInput::Save => match batch.save_all().await {
            Ok(ids) => shell.notify(
                "Questions saved",
                format!("{} question(s) added to the bank", ids.len()),
                NoticeLevel::Success,
            ),
            Err(err) => shell.report_error("Save failed", err.to_string()),
        },
        AdminInput::Done => {
            if !batch.is_empty() {
                shell.notify(
                    "Unsaved questions",
                    format!("{} staged question(s) discarded", batch.len()),
                    NoticeLevel::Warning,
                );
            }
            return Ok(false);
        }
        AdminInput::Help => println!("{HELP}"),
    }
    Ok(true)
}

/// Run the admin prompt until `done` or end of input.
pub async fn run_admin<R>(
    batch: &mut QuestionBatch,
    shell: &mut AppShell,
    lines: &mut Lines<R>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("{HELP}");
    loop {
        print!("admin ({} staged)> ", batch.len());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let keep_going = match AdminInput::parse(&line) {
            Some(input) => handle(input, batch, shell, lines).await?,
            None => {
                println!("? {HELP}");
                true
            }
        };
        print_notices(shell);
        if !keep_going {
            break;
        }
    }
    Ok(())
}

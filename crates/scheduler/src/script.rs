//! Line-oriented command scripts for driving a [`TaskScheduler`].
//!
//! ```text
//! # comment
//! add 1 10
//! change 1 100
//! get
//! peek
//! remove 1
//! len
//! drain
//! ```
//!
//! Blank lines and `#` comments are skipped; verbs are case-insensitive.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use taskheap_core::CoreError;

use crate::error::SchedulerError;
use crate::scheduler::TaskScheduler;
use crate::task::{AddOutcome, Priority, Task, TaskId};

/// One parsed script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add { identifier: TaskId, priority: Priority },
    Change { identifier: TaskId, priority: Priority },
    Get,
    Peek,
    Remove { identifier: TaskId },
    Len,
    Drain,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { identifier, priority } => write!(f, "add {identifier} {priority}"),
            Self::Change { identifier, priority } => write!(f, "change {identifier} {priority}"),
            Self::Get => f.write_str("get"),
            Self::Peek => f.write_str("peek"),
            Self::Remove { identifier } => write!(f, "remove {identifier}"),
            Self::Len => f.write_str("len"),
            Self::Drain => f.write_str("drain"),
        }
    }
}

/// What a command did, one per executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Event {
    Add {
        identifier: TaskId,
        priority: Priority,
        #[serde(flatten)]
        outcome: AddOutcome,
    },
    Change {
        identifier: TaskId,
        priority: Priority,
        applied: bool,
    },
    Get { task: Option<Task> },
    Peek { task: Option<Task> },
    Remove { identifier: TaskId, task: Option<Task> },
    Len { len: usize },
    Drain { tasks: Vec<Task> },
}

/// Parse a whole script.
pub fn parse_script(source: &str) -> Result<Vec<Command>, SchedulerError> {
    let mut commands = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        if let Some(command) = parse_line(i + 1, raw)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Read and parse a script file.
pub fn parse_script_file(path: &Path) -> Result<Vec<Command>, SchedulerError> {
    let source = std::fs::read_to_string(path).map_err(CoreError::from)?;
    parse_script(&source)
}

/// Execute `commands` in order against `scheduler`.
///
/// Stops at the first failing command (a rejected duplicate add).
pub fn run_script(
    scheduler: &mut TaskScheduler,
    commands: &[Command],
) -> Result<Vec<Event>, SchedulerError> {
    let mut events = Vec::with_capacity(commands.len());
    for command in commands {
        debug!(%command, "Executing");
        let event = match *command {
            Command::Add { identifier, priority } => Event::Add {
                identifier,
                priority,
                outcome: scheduler.add_task(identifier, priority)?,
            },
            Command::Change { identifier, priority } => Event::Change {
                identifier,
                priority,
                applied: scheduler.change_task_priority(identifier, priority),
            },
            Command::Get => Event::Get {
                task: scheduler.get_task(),
            },
            Command::Peek => Event::Peek {
                task: scheduler.peek(),
            },
            Command::Remove { identifier } => Event::Remove {
                identifier,
                task: scheduler.remove_task(identifier),
            },
            Command::Len => Event::Len {
                len: scheduler.len(),
            },
            Command::Drain => Event::Drain {
                tasks: scheduler.drain().collect(),
            },
        };
        events.push(event);
    }
    Ok(events)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, SchedulerError> {
    let content = match raw.split_once('#') {
        Some((before, _)) => before,
        None => raw,
    };
    let mut tokens = content.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();
    let verb = verb.to_ascii_lowercase();

    let command = match verb.as_str() {
        "add" | "change" => {
            expect_args(line, &verb, &args, 2)?;
            let identifier = parse_int(line, "identifier", args[0])?;
            let priority = parse_int(line, "priority", args[1])?;
            if verb == "add" {
                Command::Add { identifier, priority }
            } else {
                Command::Change { identifier, priority }
            }
        }
        "remove" => {
            expect_args(line, &verb, &args, 1)?;
            Command::Remove {
                identifier: parse_int(line, "identifier", args[0])?,
            }
        }
        "get" | "peek" | "len" | "drain" => {
            expect_args(line, &verb, &args, 0)?;
            match verb.as_str() {
                "get" => Command::Get,
                "peek" => Command::Peek,
                "len" => Command::Len,
                _ => Command::Drain,
            }
        }
        other => {
            return Err(SchedulerError::parse(line, format!("unknown command `{other}`")));
        }
    };
    Ok(Some(command))
}

fn expect_args(line: usize, verb: &str, args: &[&str], expected: usize) -> Result<(), SchedulerError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(SchedulerError::parse(
            line,
            format!("`{verb}` takes {expected} argument(s), found {}", args.len()),
        ))
    }
}

fn parse_int(line: usize, what: &str, token: &str) -> Result<i64, SchedulerError> {
    token
        .parse()
        .map_err(|e| SchedulerError::parse(line, format!("invalid {what} `{token}`: {e}")))
}

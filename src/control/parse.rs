//! Parse control-surface command lines.
//!
//! | Line | Command |
//! |------|---------|
//! | `play <src>` | intercepted playback of `<src>` |
//! | `upload <category> <path>` | ingest `<path>` as the category's asset |
//! | `test <category>` | play the raw asset |
//! | `clear <category> [--yes]` | remove the asset |
//! | `tag <category>` | arm tag mode |
//! | `reset [--yes]` | forget learned tags |
//! | `toggle` | flip the enabled flag |
//! | `status` | report status |
//! | `quit` / `exit` | stop the session |

use std::path::PathBuf;

use thiserror::Error;

use crate::router::Category;

use super::{Command, ControlAction};

const CONFIRM_FLAG: &str = "--yes";

/// Why a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command \"{0}\"")]
    UnknownVerb(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument \"{0}\"")]
    UnexpectedArgument(String),
}

/// Parse one line of input into a [`Command`].
///
/// # Examples
///
/// ```
/// use custom_sound::control::{parse_command, Command, ControlAction};
/// use custom_sound::router::Category;
///
/// assert_eq!(
///     parse_command("tag trade"),
///     Ok(Command::Control(ControlAction::TagNext { category: Category::trade() }))
/// );
/// assert!(parse_command("dance").is_err());
/// ```
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "play" => {
            if rest.is_empty() {
                Err(ParseError::MissingArgument("source"))
            } else {
                Ok(Command::Play(rest.to_string()))
            }
        }
        "upload" => {
            let (category, path) = rest
                .split_once(char::is_whitespace)
                .ok_or(if rest.is_empty() {
                    ParseError::MissingArgument("category")
                } else {
                    ParseError::MissingArgument("file path")
                })?;
            Ok(Command::Control(ControlAction::Upload {
                category: Category::new(category),
                path: PathBuf::from(path.trim()),
            }))
        }
        "test" => Ok(Command::Control(ControlAction::Test {
            category: single_category(rest)?,
        })),
        "tag" => Ok(Command::Control(ControlAction::TagNext {
            category: single_category(rest)?,
        })),
        "clear" => {
            let (rest, confirmed) = strip_confirm(rest);
            Ok(Command::Control(ControlAction::Clear {
                category: single_category(rest)?,
                confirmed,
            }))
        }
        "reset" => {
            let (rest, confirmed) = strip_confirm(rest);
            no_arguments(rest)?;
            Ok(Command::Control(ControlAction::ResetLearned { confirmed }))
        }
        "toggle" => no_arguments(rest).map(|_| Command::Control(ControlAction::Toggle)),
        "status" => no_arguments(rest).map(|_| Command::Control(ControlAction::Status)),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::UnknownVerb(other.to_string())),
    }
}

fn single_category(rest: &str) -> Result<Category, ParseError> {
    let mut words = rest.split_whitespace();
    let name = words.next().ok_or(ParseError::MissingArgument("category"))?;
    if let Some(extra) = words.next() {
        return Err(ParseError::UnexpectedArgument(extra.to_string()));
    }
    Ok(Category::new(name))
}

fn no_arguments(rest: &str) -> Result<(), ParseError> {
    match rest.split_whitespace().next() {
        Some(extra) => Err(ParseError::UnexpectedArgument(extra.to_string())),
        None => Ok(()),
    }
}

/// Remove a trailing `--yes`.
fn strip_confirm(rest: &str) -> (&str, bool) {
    match rest.strip_suffix(CONFIRM_FLAG) {
        Some(stripped) if stripped.is_empty() || stripped.ends_with(char::is_whitespace) => {
            (stripped.trim_end(), true)
        }
        _ => (rest, false),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Player command parsing.
//!
//! Input is whitespace-tokenized and case-insensitive. An empty line
//! parses to `None`. Range checks on system ids and amounts happen
//! later, at dispatch, where the live state is available.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SystemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Stabilize { id: SystemId },
    Divert { from: SystemId, to: SystemId, amount: i32 },
    Vent { id: SystemId },
    Override { id: SystemId },
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Error: Invalid numeric argument '{0}'.")]
    BadNumber(String),

    #[error("Unknown command: {0}")]
    Unknown(String),
}

impl Command {
    /// Parse one input line. Empty or all-whitespace lines yield
    /// `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let lower = line.trim().to_lowercase();
        let parts: Vec<&str> = lower.split_whitespace().collect();
        let Some((&verb, args)) = parts.split_first() else {
            return Ok(None);
        };
        let cmd = match verb {
            "quit" => Command::Quit,
            "stabilize" => Command::Stabilize {
                id: one_id(args, "stabilize <system_id>")?,
            },
            "vent" => Command::Vent {
                id: one_id(args, "vent <system_id>")?,
            },
            "override" => Command::Override {
                id: one_id(args, "override <system_id>")?,
            },
            "divert" => {
                if args.len() != 3 {
                    return Err(ParseError::Usage("divert <from_id> <to_id> <amount>"));
                }
                Command::Divert {
                    from: number(args[0])?,
                    to: number(args[1])?,
                    amount: number(args[2])?,
                }
            }
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

fn one_id(args: &[&str], usage: &'static str) -> Result<SystemId, ParseError> {
    match args {
        [id] => number(id),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn number<T: std::str::FromStr>(token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::BadNumber(token.to_string()))
}

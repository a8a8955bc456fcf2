//! Input line parsing.

use std::path::PathBuf;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the draft text.
    Edit(String),
    /// Append characters one keystroke at a time.
    Type(String),
    Attach(PathBuf),
    Detach,
    Share,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "text = set draft | /type <text> | /attach <path> | /detach | /share | /refresh | /quit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Edit(line.to_string());
        };

        let (name, arg) = match rest.split_once(' ') {
            Some((name, arg)) => (name, arg),
            None => (rest, ""),
        };

        match name {
            "type" => Command::Type(arg.to_string()),
            "attach" if !arg.trim().is_empty() => Command::Attach(PathBuf::from(arg.trim())),
            "detach" => Command::Detach,
            "share" | "post" => Command::Share,
            "refresh" => Command::Refresh,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

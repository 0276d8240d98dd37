// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiocdev_pin::{DriveMode, Value};

/// A validated request entered at the interactive prompt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Quit,
    Help,
    Write(Value),
    Toggle,
    Read,
    SetDriveMode(DriveMode),
    Info,
}

impl Command {
    /// The long command names, for completion.
    pub const NAMES: [&'static str; 7] = [
        "help",
        "info",
        "quit",
        "read",
        "setdrivemode",
        "toggle",
        "write",
    ];

    /// Parse a line of input.
    ///
    /// Returns None for a line containing no words.
    /// Words following a complete command are ignored.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            None => return Ok(None),
            Some("q") | Some("quit") => Command::Quit,
            Some("h") | Some("help") => Command::Help,
            Some("w") | Some("write") => Command::Write(
                words
                    .next()
                    .and_then(|w| w.parse().ok())
                    .ok_or(CommandError::ExpectingValue)?,
            ),
            Some("t") | Some("toggle") => Command::Toggle,
            Some("r") | Some("read") => Command::Read,
            Some("setdrivemode") => Command::SetDriveMode(
                words
                    .next()
                    .and_then(|w| w.parse().ok())
                    .ok_or(CommandError::ExpectingDriveMode)?,
            ),
            Some("i") | Some("info") => Command::Info,
            Some(x) => return Err(CommandError::Unrecognized(x.into())),
        };
        Ok(Some(cmd))
    }
}

/// Errors detected parsing a command.
///
/// The Display is the diagnostic reported to the user.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Syntax error: expecting 0 or 1\nUsage: write 0|1")]
    ExpectingValue,

    #[error("Syntax error: expecting valid drive mode")]
    ExpectingDriveMode,

    #[error("Unrecognized command: {0}. Type 'help' for command usage.")]
    Unrecognized(String),
}

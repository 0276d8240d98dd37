// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::command::Command;
use crate::session::LineSource;
use anyhow::anyhow;
use anyhow::Result;
use gpiocdev_pin::DriveMode;
use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};
use std::str::SplitWhitespace;

pub struct Editor {
    rl: rustyline::Editor<InteractiveHelper, FileHistory>,
    prompt: String,
}

impl Editor {
    pub fn new(prompt: &str) -> Result<Editor> {
        let config = rustyline::Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(true)
            .max_history_size(20)?
            .history_ignore_space(true)
            .build();
        let mut rl = rustyline::Editor::with_config(config)?;
        rl.set_helper(Some(InteractiveHelper {}));
        Ok(Editor {
            rl,
            prompt: prompt.to_string(),
        })
    }
}

impl LineSource for Editor {
    fn next_line(&mut self) -> Result<Option<String>> {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        /*
         * manually print the prompt, as rustyline doesn't if stdout
         * is not a tty? And flush to ensure the prompt and any
         * output buffered from the previous command is sent.
         */
        _ = stdout.write(self.prompt.as_bytes());
        _ = stdout.flush();
        match self.rl.readline(self.prompt.as_str()) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(anyhow!(e)),
        }
    }
}

#[derive(Helper, Validator, Hinter, Highlighter)]
pub struct InteractiveHelper {}

impl Completer for InteractiveHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        Ok(complete(&line[..pos]))
    }
}

// completion of the line up to the cursor
fn complete(line: &str) -> (usize, Vec<Pair>) {
    const VALUES: [&str; 2] = ["0", "1"];
    let cmd_pos = line.len() - line.trim_start().len();
    let mut words = line.split_whitespace();
    match words.next() {
        Some(cmd) if line.len() > cmd_pos + cmd.len() => match cmd {
            "setdrivemode" => complete_arg(line, words, &DriveMode::NAMES),
            "w" | "write" => complete_arg(line, words, &VALUES),
            _ => (line.len(), vec![]),
        },
        Some(cmd) => {
            let candidates = Command::NAMES
                .iter()
                .filter(|x| x.starts_with(cmd))
                .map(|x| base_pair(x))
                .collect();
            (cmd_pos, candidates)
        }
        None => (line.len(), Command::NAMES.iter().map(|x| base_pair(x)).collect()),
    }
}

// complete the single argument of a command
fn complete_arg(line: &str, words: SplitWhitespace, values: &[&str]) -> (usize, Vec<Pair>) {
    let args: Vec<&str> = words.collect();
    let pos = line.len();
    if line.len() != line.trim_end().len() {
        if args.is_empty() {
            return (pos, values.iter().map(|v| base_pair(v)).collect());
        }
        return (pos, vec![]);
    }
    match args.as_slice() {
        [part] => {
            let part_lower = part.to_ascii_lowercase();
            let candidates = values
                .iter()
                .filter(|v| v.to_ascii_lowercase().starts_with(&part_lower))
                .map(|v| base_pair(v))
                .collect();
            (pos - part.len(), candidates)
        }
        _ => (pos, vec![]),
    }
}

// a pair that ends a command word
fn base_pair(candidate: &str) -> Pair {
    let display = String::from(candidate);
    let mut replacement = display.clone();
    replacement.push(' ');
    Pair {
        display,
        replacement,
    }
}

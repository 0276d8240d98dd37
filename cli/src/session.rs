// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::command::Command;
use anyhow::Result;
use gpiocdev_pin::{Pin, Value};
use std::fmt::Display;
use std::io::Write;
use tracing::debug;

/// A source of command lines for a [`Session`].
pub trait LineSource {
    /// The next line of input, or None once the input is exhausted.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Whether the session continues after a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive session exercising a single pin.
///
/// Failures of pin operations are reported to the output and the session
/// continues.
/// Only a quit command or the end of input ends the session.
/// Errors returned by session methods are failures to read input or write
/// output.
pub struct Session<P, W> {
    pin: P,
    out: W,
    // The value last driven by toggle.
    // Assumed high at the start of the session, not read from the pin.
    latch: Value,
}

impl<P: Pin, W: Write> Session<P, W> {
    pub fn new(pin: P, out: W) -> Self {
        Session {
            pin,
            out,
            latch: Value::High,
        }
    }

    /// Execute lines from the source until quit or end of input.
    pub fn run<L: LineSource>(&mut self, lines: &mut L) -> Result<()> {
        while let Some(line) = lines.next_line()? {
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Parse and execute a single line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let cmd = match Command::parse(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?cmd, "dispatch");
        match cmd {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => self.help()?,
            Command::Write(value) => {
                if let Err(e) = self.pin.write(value) {
                    writeln!(self.out, "Failed to write pin: {e}")?;
                }
            }
            Command::Toggle => self.toggle()?,
            Command::Read => match self.pin.read() {
                Ok(value) => writeln!(self.out, "{value}")?,
                Err(e) => writeln!(self.out, "Failed to read pin: {e}")?,
            },
            Command::SetDriveMode(mode) => {
                if let Err(e) = self.pin.set_drive_mode(mode) {
                    writeln!(self.out, "Failed to set drive mode: {e}")?;
                }
            }
            Command::Info => self.info()?,
        }
        Ok(Flow::Continue)
    }

    fn toggle(&mut self) -> Result<()> {
        let value = self.latch.not();
        match self.pin.write(value) {
            Ok(()) => self.latch = value,
            Err(e) => writeln!(self.out, "Failed to write pin: {e}")?,
        }
        Ok(())
    }

    fn info(&mut self) -> Result<()> {
        let pin = &self.pin;
        writeln!(self.out, "        Pin Number: {}", pin.pin_number())?;
        writeln!(self.out, "      Sharing Mode: {}", pin.sharing_mode())?;
        writeln!(self.out, "  Debounce Timeout: {:?}", pin.debounce_timeout())?;
        writeln!(self.out, "        Drive Mode: {}", or_undefined(pin.drive_mode()))?;
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        let cmds = [
            ("write 0|1", "w", "Write pin high or low"),
            ("toggle", "t", "Toggle the pin from its current state"),
            ("read", "r", "Read pin"),
            (
                "setdrivemode drive_mode",
                "",
                "Set the pin's drive mode. Drive modes:\n\
                 where drive_mode = input|output|\n\
                 \x20                   inputPullUp|inputPullDown",
            ),
            ("info", "i", "Dump information about the pin"),
            ("help", "h", "Display this help message"),
            ("quit", "q", "Quit"),
        ];
        writeln!(self.out, "Commands:")?;
        for (cmd, alias, help) in cmds {
            let mut lines = help.split('\n');
            let first = lines.next().unwrap_or_default();
            writeln!(self.out, " > {cmd:<25} {alias:<2} {first}")?;
            for line in lines {
                writeln!(self.out, "     {line}")?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }
}

fn or_undefined<T: Display>(v: Option<T>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => String::from("[undefined]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpiocdev_pin::{DriveMode, Error, SharingMode};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// A pin that records the operations applied to it.
    #[derive(Debug)]
    struct FakePin {
        level: Value,
        mode: Option<DriveMode>,
        writes: Vec<Value>,
        mode_sets: usize,
        // os error code returned by failing operations
        fail_code: Option<i32>,
    }

    impl FakePin {
        fn new() -> Self {
            FakePin {
                level: Value::Low,
                mode: Some(DriveMode::Output),
                writes: Vec::new(),
                mode_sets: 0,
                fail_code: None,
            }
        }

        fn failing(code: i32) -> Self {
            FakePin {
                fail_code: Some(code),
                ..FakePin::new()
            }
        }

        fn check(&self) -> Result<(), Error> {
            match self.fail_code {
                Some(code) => Err(std::io::Error::from_raw_os_error(code).into()),
                None => Ok(()),
            }
        }
    }

    impl Pin for FakePin {
        fn read(&mut self) -> Result<Value, Error> {
            self.check()?;
            Ok(self.level)
        }

        fn write(&mut self, value: Value) -> Result<(), Error> {
            self.check()?;
            self.writes.push(value);
            self.level = value;
            Ok(())
        }

        fn set_drive_mode(&mut self, mode: DriveMode) -> Result<(), Error> {
            self.check()?;
            self.mode_sets += 1;
            self.mode = Some(mode);
            Ok(())
        }

        fn drive_mode(&self) -> Option<DriveMode> {
            self.mode
        }

        fn sharing_mode(&self) -> SharingMode {
            SharingMode::SharedReadOnly
        }

        fn debounce_timeout(&self) -> Duration {
            Duration::from_millis(5)
        }

        fn pin_number(&self) -> u32 {
            47
        }
    }

    struct Script(VecDeque<String>);

    impl Script {
        fn new(lines: &[&str]) -> Self {
            Script(lines.iter().map(|l| l.to_string()).collect())
        }
    }

    impl LineSource for Script {
        fn next_line(&mut self) -> Result<Option<String>> {
            Ok(self.0.pop_front())
        }
    }

    fn session(pin: FakePin) -> Session<FakePin, Vec<u8>> {
        Session::new(pin, Vec::new())
    }

    fn output(s: &Session<FakePin, Vec<u8>>) -> String {
        String::from_utf8(s.out.clone()).unwrap()
    }

    fn run(s: &mut Session<FakePin, Vec<u8>>, lines: &[&str]) {
        s.run(&mut Script::new(lines)).unwrap();
    }

    #[test]
    fn write_then_read() {
        let mut s = session(FakePin::new());
        run(&mut s, &["write 1", "read"]);
        assert_eq!(s.pin.writes, vec![Value::High]);
        assert_eq!(output(&s), "High\n");
    }

    #[test]
    fn read_is_idempotent() {
        let mut s = session(FakePin::new());
        run(&mut s, &["r", "r"]);
        assert_eq!(output(&s), "Low\nLow\n");
    }

    #[test]
    fn write_syntax_error() {
        let mut s = session(FakePin::new());
        run(&mut s, &["write 2", "write", "w high"]);
        assert!(s.pin.writes.is_empty());
        assert_eq!(
            output(&s),
            "Syntax error: expecting 0 or 1\nUsage: write 0|1\n".repeat(3)
        );
    }

    #[test]
    fn write_failure_continues() {
        let mut s = session(FakePin::failing(5));
        run(&mut s, &["write 1", "write 0"]);
        let out = output(&s);
        assert_eq!(out.lines().count(), 2);
        for line in out.lines() {
            assert!(line.starts_with("Failed to write pin: "), "{}", line);
            assert!(line.contains("os error 5"), "{}", line);
        }
    }

    #[test]
    fn read_failure() {
        let mut s = session(FakePin::failing(1));
        run(&mut s, &["read"]);
        let out = output(&s);
        assert!(out.starts_with("Failed to read pin: "), "{}", out);
        assert!(out.contains("os error 1"), "{}", out);
    }

    #[test]
    fn toggle_starts_from_high() {
        let mut s = session(FakePin::new());
        run(&mut s, &["toggle"]);
        assert_eq!(s.pin.writes, vec![Value::Low]);
        assert_eq!(s.latch, Value::Low);
        assert_eq!(output(&s), "");
    }

    #[test]
    fn toggle_complements_latch() {
        let mut s = session(FakePin::new());
        run(&mut s, &["t", "t", "t"]);
        assert_eq!(s.pin.writes, vec![Value::Low, Value::High, Value::Low]);
        assert_eq!(s.latch, Value::Low);
    }

    #[test]
    fn toggle_ignores_write() {
        // the latch is only changed by toggle
        let mut s = session(FakePin::new());
        run(&mut s, &["write 0", "toggle"]);
        assert_eq!(s.pin.writes, vec![Value::Low, Value::Low]);
        assert_eq!(s.latch, Value::Low);
    }

    #[test]
    fn toggle_failure_keeps_latch() {
        let mut s = session(FakePin::failing(5));
        run(&mut s, &["toggle"]);
        assert_eq!(s.latch, Value::High);
        assert!(output(&s).starts_with("Failed to write pin: "));

        // a retry targets the same value
        s.pin.fail_code = None;
        run(&mut s, &["toggle"]);
        assert_eq!(s.pin.writes, vec![Value::Low]);
        assert_eq!(s.latch, Value::Low);
    }

    #[test]
    fn set_drive_mode() {
        let mut s = session(FakePin::new());
        run(&mut s, &["setdrivemode INPUTPULLUP"]);
        assert_eq!(s.pin.mode, Some(DriveMode::InputPullUp));
        assert_eq!(output(&s), "");
    }

    #[test]
    fn set_drive_mode_syntax_error() {
        let mut s = session(FakePin::new());
        run(&mut s, &["setdrivemode bogus"]);
        assert_eq!(s.pin.mode_sets, 0);
        assert_eq!(s.pin.mode, Some(DriveMode::Output));
        assert_eq!(output(&s), "Syntax error: expecting valid drive mode\n");
    }

    #[test]
    fn set_drive_mode_failure() {
        let mut s = session(FakePin::failing(22));
        run(&mut s, &["setdrivemode input"]);
        assert_eq!(s.pin.mode, Some(DriveMode::Output));
        assert!(output(&s).starts_with("Failed to set drive mode: "));
    }

    #[test]
    fn info() {
        let mut s = session(FakePin::new());
        run(&mut s, &["info"]);
        assert_eq!(
            output(&s),
            "        Pin Number: 47\n\
             \x20     Sharing Mode: SharedReadOnly\n\
             \x20 Debounce Timeout: 5ms\n\
             \x20       Drive Mode: output\n"
        );
    }

    #[test]
    fn info_undefined_drive_mode() {
        let mut pin = FakePin::failing(5);
        pin.mode = None;
        let mut s = session(pin);
        run(&mut s, &["i"]);
        assert!(output(&s).ends_with("        Drive Mode: [undefined]\n"));
    }

    #[test]
    fn help() {
        let mut s = session(FakePin::new());
        run(&mut s, &["help"]);
        let out = output(&s);
        assert!(out.starts_with("Commands:\n"));
        for name in Command::NAMES {
            assert!(out.contains(&format!(" > {name}")), "help missing {}", name);
        }
        for mode in DriveMode::NAMES {
            assert!(out.contains(mode), "help missing {}", mode);
        }
    }

    #[test]
    fn unrecognized_command() {
        let mut s = session(FakePin::new());
        run(&mut s, &["bogus arg", "read"]);
        assert!(s.pin.writes.is_empty());
        assert_eq!(s.latch, Value::High);
        assert_eq!(
            output(&s),
            "Unrecognized command: bogus. Type 'help' for command usage.\nLow\n"
        );
    }

    #[test]
    fn empty_line() {
        let mut s = session(FakePin::new());
        assert_eq!(s.execute("").unwrap(), Flow::Continue);
        assert_eq!(s.execute("   ").unwrap(), Flow::Continue);
        assert_eq!(output(&s), "");
        assert_eq!(s.latch, Value::High);
    }

    #[test]
    fn quit_first() {
        let mut s = session(FakePin::new());
        let mut script = Script::new(&["quit", "write 1"]);
        s.run(&mut script).unwrap();
        assert!(s.pin.writes.is_empty());
        assert_eq!(output(&s), "");
        // remaining lines are not consumed
        assert_eq!(script.0.len(), 1);
    }

    #[test]
    fn quit_alias() {
        let mut s = session(FakePin::new());
        assert_eq!(s.execute("q").unwrap(), Flow::Quit);
    }

    #[test]
    fn end_of_input() {
        let mut s = session(FakePin::new());
        run(&mut s, &["write 1"]);
        assert_eq!(s.pin.writes, vec![Value::High]);
    }
}

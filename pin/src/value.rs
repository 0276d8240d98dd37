// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use embedded_hal::digital::PinState;
use std::fmt;
use std::str::FromStr;

/// The physical level of a pin.
///
/// Parsed from the integers `0` and `1`, displayed as `Low` and `High`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Value {
    /// The pin is low.
    Low,
    /// The pin is high.
    High,
}

impl Value {
    /// The value opposite the current value.
    pub fn not(&self) -> Value {
        match self {
            Value::High => Value::Low,
            Value::Low => Value::High,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Value::Low => "Low",
            Value::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Value {
    type Err = ParseValueError;

    /// Only the integers 0 and 1 are values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(0) => Ok(Value::Low),
            Ok(1) => Ok(Value::High),
            _ => Err(ParseValueError::new(s)),
        }
    }
}

impl From<PinState> for Value {
    fn from(state: PinState) -> Value {
        match state {
            PinState::Low => Value::Low,
            PinState::High => Value::High,
        }
    }
}

impl From<Value> for PinState {
    fn from(v: Value) -> PinState {
        match v {
            Value::Low => PinState::Low,
            Value::High => PinState::High,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        match b {
            false => Value::Low,
            true => Value::High,
        }
    }
}

/// The electrical configuration of a pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriveMode {
    /// An input with no bias.
    Input,
    /// A push-pull output.
    Output,
    /// An input pulled up.
    InputPullUp,
    /// An input pulled down.
    InputPullDown,
}

impl DriveMode {
    /// The canonical names of all drive modes.
    pub const NAMES: [&'static str; 4] = ["input", "output", "inputPullUp", "inputPullDown"];

    /// Returns true if the mode configures the pin as an input.
    pub fn is_input(&self) -> bool {
        !matches!(self, DriveMode::Output)
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriveMode::Input => "input",
            DriveMode::Output => "output",
            DriveMode::InputPullUp => "inputPullUp",
            DriveMode::InputPullDown => "inputPullDown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DriveMode {
    type Err = ParseDriveModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_ascii_lowercase().as_str() {
            "input" => DriveMode::Input,
            "output" => DriveMode::Output,
            "inputpullup" => DriveMode::InputPullUp,
            "inputpulldown" => DriveMode::InputPullDown,
            _ => return Err(ParseDriveModeError::new(s)),
        };
        Ok(mode)
    }
}

/// How the pin is shared with other users.
///
/// Only ever reported, never requested.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SharingMode {
    /// No other user may open the pin.
    Exclusive,
    /// Other users may open the pin to read it.
    SharedReadOnly,
}

impl fmt::Display for SharingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SharingMode::Exclusive => "Exclusive",
            SharingMode::SharedReadOnly => "SharedReadOnly",
        };
        write!(f, "{}", s)
    }
}

/// The string could not be parsed as a [`Value`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid pin value: '{value}'")]
pub struct ParseValueError {
    value: String,
}

impl ParseValueError {
    fn new<S: Into<String>>(value: S) -> ParseValueError {
        ParseValueError {
            value: value.into(),
        }
    }
}

/// The string could not be parsed as a [`DriveMode`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid drive mode: '{mode}'")]
pub struct ParseDriveModeError {
    mode: String,
}

impl ParseDriveModeError {
    fn new<S: Into<String>>(mode: S) -> ParseDriveModeError {
        ParseDriveModeError { mode: mode.into() }
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{DriveMode, Error, Pin, SharingMode, Value};
use embedded_hal::digital::PinState;
use gpiocdev::{
    line::{Bias, Config, Direction, Offset, Value as LineValue},
    request::Request,
};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Provides the [`Pin`] and [`embedded_hal::digital`] traits for a
/// [`gpiocdev::request::Request`] containing a single line.
///
/// Holding the [`CdevPin`] grants exclusive access to the pin.
///
/// Do NOT drop the [`CdevPin`] until you are completely done with it.
/// Dropping releases the line, after which it may be altered, either by
/// other users or by the kernel itself.
#[derive(Debug)]
pub struct CdevPin {
    req: Request,
    offset: Offset,
    // snapshot of the line config currently applied to the request
    config: Config,
}

impl CdevPin {
    /// Creates a new pin for the given `offset` on the given `chip`.
    ///
    /// The pin is requested as an input.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiocdev_pin::Error> {
    /// use gpiocdev_pin::{CdevPin, Pin, Value};
    ///
    /// let mut pin = gpiocdev_pin::CdevPin::new("/dev/gpiochip0", 4)?;
    /// if pin.read()? == Value::High {
    ///     println!("Input is high.");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<P>(chip: P, offset: u32) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let req = Request::builder()
            .on_chip(chip.as_ref())
            .with_line(offset)
            .as_input()
            .request()?;

        CdevPin::try_from(req)
    }

    #[inline]
    fn line_value(&self, value: Value) -> LineValue {
        state_to_value(value.into(), self.config.active_low)
    }
}

impl TryFrom<Request> for CdevPin {
    type Error = Error;

    /// Convert any single line [`Request`] into a [`CdevPin`].
    ///
    /// This allows for advanced configurations such as debounce
    /// or using the active_low flag to flip the line polarity.
    fn try_from(req: Request) -> Result<Self, Self::Error> {
        let config = req.config();
        let offsets = config.lines();
        if offsets.len() != 1 {
            return Err(Error::MultipleLinesRequested);
        }
        let offset = offsets[0];
        // unwrap is safe as line config must exist.
        let line_config = config.line_config(offset).unwrap().clone();
        debug!(offset, config = ?line_config, "requested pin");

        Ok(CdevPin {
            req,
            offset,
            config: line_config,
        })
    }
}

impl From<CdevPin> for Request {
    /// Convert the [`CdevPin`] into the contained [`Request`].
    fn from(pin: CdevPin) -> Self {
        pin.req
    }
}

impl Pin for CdevPin {
    fn read(&mut self) -> Result<Value, Error> {
        let value = self.req.value(self.offset)?;
        Ok(value_to_state(value, self.config.active_low).into())
    }

    fn write(&mut self, value: Value) -> Result<(), Error> {
        let lv = self.line_value(value);
        debug!(offset = self.offset, %value, "set value");
        self.req.set_value(self.offset, lv)?;
        self.config.value = Some(lv);
        Ok(())
    }

    fn set_drive_mode(&mut self, mode: DriveMode) -> Result<(), Error> {
        let mut lc = self.config.clone();
        if mode.is_input() {
            lc.direction = Some(Direction::Input);
            lc.drive = None;
            lc.value = None;
            lc.bias = Some(match mode {
                DriveMode::InputPullUp => Bias::PullUp,
                DriveMode::InputPullDown => Bias::PullDown,
                _ => Bias::Disabled,
            });
        } else {
            // hold the level currently on the line to avoid a glitch
            let value = self.req.value(self.offset)?;
            lc.direction = Some(Direction::Output);
            lc.value = Some(value);
            lc.bias = None;
            lc.edge_detection = None;
            lc.debounce_period = None;
        }
        let mut config = self.req.config();
        config.from_line_config(&lc);
        debug!(offset = self.offset, %mode, "reconfigure");
        self.req.reconfigure(&config)?;
        // only update the snapshot if the reconfigure succeeds.
        self.config = lc;
        Ok(())
    }

    fn drive_mode(&self) -> Option<DriveMode> {
        match (self.config.direction, self.config.bias) {
            (Some(Direction::Output), _) => Some(DriveMode::Output),
            (Some(Direction::Input), Some(Bias::PullUp)) => Some(DriveMode::InputPullUp),
            (Some(Direction::Input), Some(Bias::PullDown)) => Some(DriveMode::InputPullDown),
            (Some(Direction::Input), _) => Some(DriveMode::Input),
            (None, _) => None,
        }
    }

    fn sharing_mode(&self) -> SharingMode {
        // the kernel grants each request sole ownership of its lines
        SharingMode::Exclusive
    }

    fn debounce_timeout(&self) -> Duration {
        self.config.debounce_period.unwrap_or(Duration::ZERO)
    }

    fn pin_number(&self) -> u32 {
        self.offset
    }
}

impl embedded_hal::digital::ErrorType for CdevPin {
    /// Errors returned by [`CdevPin`].
    type Error = Error;
}

impl embedded_hal::digital::InputPin for CdevPin {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read()? == Value::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read()? == Value::Low)
    }
}

impl embedded_hal::digital::OutputPin for CdevPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(Value::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(Value::High)
    }
}

/// Converts a [`PinState`] to the gpiocdev logical line [`LineValue`].
fn state_to_value(state: PinState, is_active_low: bool) -> LineValue {
    let value = match state {
        PinState::High => LineValue::Active,
        PinState::Low => LineValue::Inactive,
    };
    if is_active_low {
        return value.not();
    }
    value
}

/// Converts a gpiocdev logical line [`LineValue`] to a physical [`PinState`].
fn value_to_state(value: LineValue, is_active_low: bool) -> PinState {
    let value = if is_active_low { value.not() } else { value };
    match value {
        LineValue::Active => PinState::High,
        LineValue::Inactive => PinState::Low,
    }
}

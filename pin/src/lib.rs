// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library providing a single GPIO pin abstraction, the [`Pin`] trait,
//! and an implementation of it, [`CdevPin`], for any Linux platform
//! supporting the GPIO character device.
//!
//! The [`Pin`] trait is the full capability set an interactive tool needs
//! to exercise one pin: reading and writing the level, changing the drive
//! mode, and reporting the pin configuration.
//! Tools written against the trait can be tested with a fake pin rather
//! than real hardware.
//!
//! [`CdevPin`] wraps a [`gpiocdev::request::Request`] containing a single line and
//! also provides the [`embedded_hal::digital`] traits.
//!
//! # Example Usage
//!
//! Toggling an output pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiocdev_pin::Error> {
//! use gpiocdev_pin::{CdevPin, DriveMode, Pin, Value};
//!
//! let mut pin = CdevPin::new("/dev/gpiochip0", 17)?;
//! pin.set_drive_mode(DriveMode::Output)?;
//! let value = pin.read()?;
//! pin.write(value.not())?;
//! # Ok(())
//! # }
//! ```
use std::time::Duration;

mod cdev;
pub use cdev::CdevPin;

mod value;
pub use value::{DriveMode, ParseDriveModeError, ParseValueError, SharingMode, Value};

/// The capabilities of an opened GPIO pin.
///
/// The implementor owns the pin for its lifetime and releases it when
/// dropped.
pub trait Pin {
    /// Read the current level of the pin.
    fn read(&mut self) -> Result<Value, Error>;

    /// Drive the pin to the given level.
    fn write(&mut self, value: Value) -> Result<(), Error>;

    /// Change the electrical configuration of the pin.
    ///
    /// The reported drive mode is unchanged if this fails.
    fn set_drive_mode(&mut self, mode: DriveMode) -> Result<(), Error>;

    /// The current drive mode.
    ///
    /// None if the pin configuration does not correspond to a [`DriveMode`].
    fn drive_mode(&self) -> Option<DriveMode>;

    /// How the pin is shared with other users.
    fn sharing_mode(&self) -> SharingMode;

    /// The debounce period applied to the pin.
    ///
    /// Zero if the pin is not debounced.
    fn debounce_timeout(&self) -> Duration;

    /// The number identifying the pin on its controller.
    fn pin_number(&self) -> u32;
}

/// Errors returned by [`gpiocdev_pin`](crate) types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requests can only contain a single requested line.
    #[error("Request must not contain multiple lines")]
    MultipleLinesRequested,

    /// An error returned from an underlying gpiocdev call.
    #[error("gpiocdev returned: {0}")]
    Cdev(#[source] gpiocdev::Error),

    /// An error returned from an underlying os call.
    #[error(transparent)]
    Os(#[from] std::io::Error),
}

impl From<gpiocdev::Error> for Error {
    fn from(err: gpiocdev::Error) -> Self {
        Self::Cdev(err)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

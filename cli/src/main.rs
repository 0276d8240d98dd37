// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for interactively exercising a GPIO pin.

use anyhow::{Context, Result};
use clap::Parser;
use gpiocdev::request::Request;
use gpiocdev_pin::{CdevPin, DriveMode, Pin};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

mod command;
mod common;
mod editor;
mod session;

const BIN_NAME: &str = "gpiopin";

fn main() -> ExitCode {
    _ = write_banner(&mut std::io::stdout());
    match Opts::try_parse() {
        Ok(opts) => {
            common::init_tracing(opts.verbose);
            println!("  Pin Number: {}", opts.pin);
            if let Err(e) = run(&opts) {
                eprintln!(
                    "Fatal error occurred: {}",
                    common::format_error(opts.verbose, &e)
                );
                return ExitCode::FAILURE;
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            _ = e.print();
            // help and version are not errors
            if !e.use_stderr() {
                return ExitCode::SUCCESS;
            }
        }
    }
    ExitCode::FAILURE
}

#[derive(Debug, Parser)]
#[command(
    name = "gpiopin",
    about = "A command line GPIO testing utility for a single pin.",
    after_help = "Type 'help' at the prompt for a list of commands.",
    version
)]
struct Opts {
    /// The offset of the pin on the chip
    ///
    /// A "0x" prefix is read as hex, and a leading "0" as octal.
    #[arg(value_name = "PinNumber", value_parser = common::parse_pin_number)]
    pin: u32,

    /// The chip containing the pin
    ///
    /// The chip may be identified by number, name, or path.
    /// e.g. the following all select the same chip:
    ///     --chip 0
    ///     --chip gpiochip0
    ///     --chip /dev/gpiochip0
    #[arg(short, long, value_name = "chip", default_value = "0", verbatim_doc_comment)]
    chip: String,

    /// The initial drive mode of the pin
    ///
    /// One of input, output, inputPullUp or inputPullDown.
    #[arg(short, long, value_name = "mode", default_value = "input")]
    drive_mode: DriveMode,

    /// The debounce period applied to the pin while it is an input
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, value_name = "period", value_parser = common::parse_duration)]
    debounce_period: Option<Duration>,

    /// The consumer label applied to the requested pin.
    #[arg(long, value_name = "name", default_value = "gpiopin")]
    consumer: String,

    #[command(flatten)]
    uapi_opts: common::UapiOpts,

    /// Provide more detailed error messages and debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

// printed before the arguments are checked
fn write_banner<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{BIN_NAME}: Command line GPIO testing utility")?;
    writeln!(out, "  Usage: {BIN_NAME} PinNumber")?;
    writeln!(out, "  Example: {BIN_NAME} 47")?;
    writeln!(out, "  Type 'help' for a list of commands")?;
    out.flush()
}

fn run(opts: &Opts) -> Result<()> {
    let chip = common::chip_lookup_from_id(&opts.chip)?;
    let mut pin = request_pin(&chip, opts)
        .with_context(|| format!("Failed to open pin {} on {}", opts.pin, chip.display()))?;
    if opts.drive_mode != DriveMode::Input {
        pin.set_drive_mode(opts.drive_mode)
            .with_context(|| format!("Failed to set drive mode to {}", opts.drive_mode))?;
    }
    let mut editor = editor::Editor::new("> ")?;
    session::Session::new(pin, std::io::stdout()).run(&mut editor)
}

fn request_pin(chip: &Path, opts: &Opts) -> Result<CdevPin> {
    let mut bld = Request::builder();
    bld.on_chip(chip)
        .with_consumer(&opts.consumer)
        .with_line(opts.pin)
        .as_input();
    if let Some(period) = opts.debounce_period {
        bld.with_debounce_period(period);
    }
    let abiv = common::actual_abi_version(&opts.uapi_opts)?;
    tracing::debug!(?abiv, pin = opts.pin, chip = %chip.display(), "requesting pin");
    #[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
    bld.using_abi_version(abiv);
    let req = bld.request()?;
    Ok(CdevPin::try_from(req)?)
}

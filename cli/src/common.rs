// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
#[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
use clap::ValueEnum;
use clap::Parser;
use gpiocdev::chip::is_chip;
use gpiocdev::AbiVersion;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// common helper functions

#[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
pub fn actual_abi_version(opts: &UapiOpts) -> Result<AbiVersion> {
    Ok(match opts.abi_version {
        Some(abiv) => {
            let abiv = abiv.into();
            gpiocdev::supports_abi_version(abiv)?;
            abiv
        }
        None => gpiocdev::detect_abi_version()?,
    })
}

#[cfg(not(feature = "uapi_v2"))]
pub fn actual_abi_version(_opts: &UapiOpts) -> Result<AbiVersion> {
    Ok(AbiVersion::V1)
}

#[cfg(not(feature = "uapi_v1"))]
pub fn actual_abi_version(_opts: &UapiOpts) -> Result<AbiVersion> {
    Ok(AbiVersion::V2)
}

fn chip_path_from_id(id: &str) -> PathBuf {
    if id.chars().all(char::is_numeric) {
        // from number
        return format!("/dev/gpiochip{id}").into();
    }
    if !id.chars().any(|x| x == '/') {
        // from name
        let mut p: PathBuf = "/dev".into();
        p.push(id);
        return p;
    }
    // from raw path
    id.into()
}

pub fn chip_lookup_from_id(id: &str) -> Result<PathBuf> {
    is_chip(chip_path_from_id(id))
        .with_context(|| format!("cannot find GPIO chip character device '{id}'"))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, ParseIntError),
    #[error("'{0}' is too long a period")]
    Overflow(String),
}

pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let (num, scale) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let scale: u64 = match units {
                "us" => 1_000,
                "ms" => 1_000_000,
                "s" => 1_000_000_000,
                _ => return Err(ParseDurationError::Units(s.into())),
            };
            (num, scale)
        }
        None => (s, 1_000_000),
    };
    let t = num
        .parse::<u64>()
        .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
    let nanos = t
        .checked_mul(scale)
        .ok_or_else(|| ParseDurationError::Overflow(s.into()))?;
    Ok(Duration::from_nanos(nanos))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("'{0}' {1}")]
pub struct ParsePinNumberError(String, ParseIntError);

/// Parse a pin number, with the radix determined by its prefix.
///
/// A "0x" prefix is hex, a leading "0" is octal, and anything else is decimal.
pub fn parse_pin_number(s: &str) -> std::result::Result<u32, ParsePinNumberError> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    u32::from_str_radix(digits, radix).map_err(|e| ParsePinNumberError(s.into(), e))
}

pub fn format_error(verbose: bool, e: &anyhow::Error) -> String {
    if verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

/// Route diagnostics to stderr so they never mix with session output.
///
/// RUST_LOG, if set, overrides the level selected by verbose.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// common command line parser options

#[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AbiVersionFlags {
    V1,
    V2,
}
#[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
impl From<AbiVersionFlags> for AbiVersion {
    fn from(b: AbiVersionFlags) -> Self {
        match b {
            AbiVersionFlags::V1 => AbiVersion::V1,
            AbiVersionFlags::V2 => AbiVersion::V2,
        }
    }
}

#[derive(Debug, Default, Parser)]
pub struct UapiOpts {
    /// The uAPI ABI version to use to request the pin
    ///
    /// By default the latest uAPI version supported by the kernel is used.
    #[cfg(all(feature = "uapi_v1", feature = "uapi_v2"))]
    #[arg(
        long,
        value_name = "version",
        env = "GPIOCDEV_ABI_VERSION",
        value_enum,
        ignore_case = true
    )]
    pub abi_version: Option<AbiVersionFlags>,
}

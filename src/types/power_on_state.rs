// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay state applied after the device reboots.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Power-on behavior of the relay.
///
/// The firmware calls the "restore previous state" policy `"stay"`. This
/// type always exposes it as [`PowerOnState::Restore`]: [`from_wire`]
/// accepts both `"stay"` and `"restore"`, and [`as_wire_str`] writes
/// `"stay"` back.
///
/// [`from_wire`]: PowerOnState::from_wire
/// [`as_wire_str`]: PowerOnState::as_wire_str
///
/// # Examples
///
/// ```
/// use sonoff_diy::types::PowerOnState;
///
/// assert_eq!(PowerOnState::from_wire("stay"), PowerOnState::Restore);
/// assert_eq!(PowerOnState::Restore.as_wire_str(), "stay");
/// assert_eq!("restore".parse::<PowerOnState>().unwrap(), PowerOnState::Restore);
/// assert!("bogus".parse::<PowerOnState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerOnState {
    /// Relay stays off after power-up.
    #[default]
    Off,
    /// Relay turns on after power-up.
    On,
    /// Relay restores the state it had before power loss.
    Restore,
}

impl PowerOnState {
    /// Returns the user-facing name: `off`, `on` or `restore`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Restore => "restore",
        }
    }

    /// Returns the token the firmware expects in a `startup` request.
    #[must_use]
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Restore => "stay",
        }
    }

    /// Reads the `startup` field reported by the device.
    ///
    /// Unrecognized tokens read as [`PowerOnState::Off`], the firmware
    /// default.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "on" => Self::On,
            "stay" | "restore" => Self::Restore,
            _ => Self::Off,
        }
    }
}

impl fmt::Display for PowerOnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses caller input.
///
/// Only `off`, `on` and `restore` are accepted (case-insensitive). The vendor
/// token `stay` is rejected so callers never depend on firmware vocabulary.
impl FromStr for PowerOnState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "restore" => Ok(Self::Restore),
            _ => Err(ValueError::InvalidPowerOnState(s.to_string())),
        }
    }
}

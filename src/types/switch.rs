// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off state of the relay and of pulse (inching) mode.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents an on/off state as spoken by the device.
///
/// The device uses lowercase `"on"` and `"off"` tokens both for the relay
/// (`switch` field) and for pulse mode (`pulse` field).
///
/// # Examples
///
/// ```
/// use sonoff_diy::types::SwitchState;
///
/// assert_eq!(SwitchState::On.as_str(), "on");
/// assert_eq!(SwitchState::from(false), SwitchState::Off);
/// assert_eq!("ON".parse::<SwitchState>().unwrap(), SwitchState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwitchState {
    /// Off.
    #[default]
    Off,
    /// On.
    On,
}

impl SwitchState {
    /// Returns the token used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` for [`SwitchState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            _ => Err(ValueError::InvalidSwitchState(s.to_string())),
        }
    }
}

impl From<bool> for SwitchState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

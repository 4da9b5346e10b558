// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay control commands.
//!
//! This module provides commands for the relay state, pulse (inching) mode
//! and the power-on behavior.

use serde_json::Value;

use crate::command::{Command, Endpoint, Payload};
use crate::types::{PowerOnState, SwitchState};

/// Command to switch the relay.
///
/// # Examples
///
/// ```
/// use sonoff_diy::command::{Command, SwitchCommand};
/// use sonoff_diy::types::SwitchState;
///
/// let cmd = SwitchCommand(SwitchState::On);
/// assert_eq!(cmd.payload()["switch"], "on");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchCommand(pub SwitchState);

impl Command for SwitchCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Switch
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("switch".to_string(), Value::from(self.0.as_str()));
        payload
    }
}

/// Command to control pulse (inching) mode.
///
/// In pulse mode the relay turns itself off again after `pulse_width`
/// milliseconds. The firmware only accepts a width together with the
/// pulse state, see [`PulseCommand::Set`].
///
/// # Examples
///
/// ```
/// use sonoff_diy::command::{Command, PulseCommand};
///
/// let off = PulseCommand::Off;
/// assert_eq!(off.payload()["pulse"], "off");
/// assert!(!off.payload().contains_key("pulse_width"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseCommand {
    /// Enable pulse mode, keeping the current width unless one is given.
    On {
        /// Pulse width in milliseconds.
        width_ms: Option<u32>,
    },
    /// Disable pulse mode.
    Off,
    /// Set the pulse state and width together.
    Set {
        /// Pulse state to keep or apply.
        state: SwitchState,
        /// Pulse width in milliseconds.
        width_ms: u32,
    },
}

impl PulseCommand {
    /// Creates a command enabling pulse mode with the current width.
    #[must_use]
    pub const fn on() -> Self {
        Self::On { width_ms: None }
    }

    /// Creates a command enabling pulse mode with a new width.
    #[must_use]
    pub const fn on_with_width(width_ms: u32) -> Self {
        Self::On {
            width_ms: Some(width_ms),
        }
    }
}

impl Command for PulseCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Pulse
    }

    fn payload(&self) -> Payload {
        let (state, width_ms) = match *self {
            Self::On { width_ms } => (SwitchState::On, width_ms),
            Self::Off => (SwitchState::Off, None),
            Self::Set { state, width_ms } => (state, Some(width_ms)),
        };

        let mut payload = Payload::new();
        payload.insert("pulse".to_string(), Value::from(state.as_str()));
        if let Some(width_ms) = width_ms {
            payload.insert("pulse_width".to_string(), Value::from(width_ms));
        }
        payload
    }
}

/// Command to set the relay state applied after a reboot.
///
/// # Examples
///
/// ```
/// use sonoff_diy::command::{Command, StartupCommand};
/// use sonoff_diy::types::PowerOnState;
///
/// let cmd = StartupCommand(PowerOnState::Restore);
/// assert_eq!(cmd.payload()["startup"], "stay");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupCommand(pub PowerOnState);

impl Command for StartupCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Startup
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("startup".to_string(), Value::from(self.0.as_wire_str()));
        payload
    }
}

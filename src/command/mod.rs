// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sonoff DIY command definitions.
//!
//! Every operation of the DIY-mode API is a `POST` to
//! `/zeroconf/<endpoint>` carrying a flat JSON object of scalar parameters.
//! This module provides typed representations of those requests.
//!
//! # Available Commands
//!
//! | Command Type | Endpoint | Payload |
//! |-------------|----------|---------|
//! | [`QueryCommand`] | `info`, `signal_strength` | empty |
//! | [`SwitchCommand`] | `switch` | `{"switch": "on"}` |
//! | [`PulseCommand`] | `pulse` | `{"pulse": "on", "pulse_width": 1500}` |
//! | [`StartupCommand`] | `startup` | `{"startup": "stay"}` |
//! | [`WifiCommand`] | `wifi` | `{"ssid": "..", "password": ".."}` |
//! | [`OtaCommand`] | `ota_unlock`, `ota_flash` | `{"downloadUrl": "..", "sha256sum": ".."}` |
//!
//! # Examples
//!
//! ```
//! use sonoff_diy::command::{Command, Endpoint, PulseCommand};
//!
//! let cmd = PulseCommand::on_with_width(1500);
//! assert_eq!(cmd.endpoint(), Endpoint::Pulse);
//! assert_eq!(cmd.payload()["pulse"], "on");
//! assert_eq!(cmd.payload()["pulse_width"], 1500);
//! ```

mod network;
mod ota;
mod power;
mod query;

pub use network::WifiCommand;
pub use ota::OtaCommand;
pub use power::{PulseCommand, StartupCommand, SwitchCommand};
pub use query::QueryCommand;

use std::fmt;

use serde_json::{Map, Value};

/// Parameters sent in the `data` member of a request.
pub type Payload = Map<String, Value>;

/// Endpoints below `/zeroconf/` understood by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Device information and state.
    Info,
    /// Wi-Fi signal strength.
    SignalStrength,
    /// Relay on/off.
    Switch,
    /// Pulse (inching) mode.
    Pulse,
    /// Wi-Fi credentials.
    Wifi,
    /// OTA unlock through the vendor service.
    OtaUnlock,
    /// OTA firmware flash.
    OtaFlash,
    /// Power-on state.
    Startup,
}

impl Endpoint {
    /// Returns the path segment of the endpoint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::SignalStrength => "signal_strength",
            Self::Switch => "switch",
            Self::Pulse => "pulse",
            Self::Wifi => "wifi",
            Self::OtaUnlock => "ota_unlock",
            Self::OtaFlash => "ota_flash",
            Self::Startup => "startup",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command that can be sent to a Sonoff DIY device.
pub trait Command {
    /// Returns the endpoint the command is posted to.
    fn endpoint(&self) -> Endpoint;

    /// Returns the parameters sent as the request `data`.
    ///
    /// Commands without parameters return an empty map; the firmware still
    /// expects a `data` object to be present.
    fn payload(&self) -> Payload;
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State queries.

use crate::command::{Command, Endpoint, Payload};

/// Command to read device state.
///
/// # Examples
///
/// ```
/// use sonoff_diy::command::{Command, Endpoint, QueryCommand};
///
/// assert_eq!(QueryCommand::Info.endpoint(), Endpoint::Info);
/// assert!(QueryCommand::SignalStrength.payload().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCommand {
    /// Relay, pulse, startup, SSID and OTA lock state.
    Info,
    /// Wi-Fi signal strength.
    SignalStrength,
}

impl Command for QueryCommand {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::Info => Endpoint::Info,
            Self::SignalStrength => Endpoint::SignalStrength,
        }
    }

    fn payload(&self) -> Payload {
        Payload::new()
    }
}

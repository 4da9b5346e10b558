// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wi-Fi configuration command.

use std::fmt;

use serde_json::Value;

use crate::command::{Command, Endpoint, Payload};

/// Command to move the device to another Wi-Fi network.
///
/// The device reboots and joins the new network after acknowledging.
#[derive(Clone, PartialEq, Eq)]
pub struct WifiCommand {
    ssid: String,
    password: String,
}

impl WifiCommand {
    /// Creates a new Wi-Fi command.
    #[must_use]
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }

    /// Returns the target SSID.
    #[must_use]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}

impl fmt::Debug for WifiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCommand")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Command for WifiCommand {
    fn endpoint(&self) -> Endpoint {
        Endpoint::Wifi
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("ssid".to_string(), Value::from(self.ssid.as_str()));
        payload.insert("password".to_string(), Value::from(self.password.as_str()));
        payload
    }
}

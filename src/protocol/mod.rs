// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with Sonoff DIY devices.
//!
//! The [`Protocol`] trait is the seam between the device facade and the
//! transport. [`HttpClient`] implements it over the DIY-mode HTTP API;
//! [`envelope`] holds the wire format shared by every implementation.

pub mod envelope;
#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use serde_json::Value;

use crate::command::{Command, Payload};
use crate::error::Error;

/// Trait for transports that exchange commands with a device.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Returns the device ID placed in every request envelope.
    fn device_id(&self) -> &str;

    /// Sends a command to the device and returns the decoded `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the exchange fails and
    /// [`Error::Protocol`] if the response breaks the protocol.
    async fn send_command<C: Command + Sync>(&self, command: &C) -> Result<Option<Value>, Error> {
        self.send_raw(command.endpoint().as_str(), command.payload())
            .await
    }

    /// Sends a payload to an arbitrary endpoint below `/zeroconf/`.
    ///
    /// Returns `Ok(None)` when the device acknowledges without data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the exchange fails and
    /// [`Error::Protocol`] if the response breaks the protocol.
    async fn send_raw(&self, sub_path: &str, payload: Payload) -> Result<Option<Value>, Error>;

    /// Releases resources owned by the transport.
    fn close(&self) {}
}

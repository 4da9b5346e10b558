// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `sonoff_diy` - A Rust library to control Sonoff devices in DIY mode.
//!
//! Sonoff switches flashed or switched into "DIY mode" expose a small local
//! JSON API on port 8081. This library provides an async client for it.
//!
//! # Supported Features
//!
//! - **Power control**: Turn the relay on/off, set the power-on state
//! - **Pulse mode**: Enable/disable inching and set its duration
//! - **State queries**: Relay, pulse, startup, SSID and signal strength
//! - **Network**: Move the device to another Wi-Fi network
//! - **OTA**: Unlock and flash firmware images
//!
//! # Quick Start
//!
//! ```no_run
//! use sonoff_diy::Device;
//!
//! #[tokio::main]
//! async fn main() -> sonoff_diy::Result<()> {
//!     // Returns (device, initial_snapshot) tuple
//!     let (device, snapshot) = Device::http("192.168.1.100")
//!         .with_device_id("100090ab1a")
//!         .build()
//!         .await?;
//!
//!     println!("signal: {}%", snapshot.signal_strength_percent());
//!
//!     if snapshot.is_on() {
//!         device.turn_off().await?;
//!     } else {
//!         device.turn_on().await?;
//!     }
//!
//!     device.close();
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every operation returns [`Error`]. Transport failures
//! ([`Error::Connection`]) are worth retrying; the library never retries on
//! its own. See [`error`] for the full taxonomy.

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod types;

pub use command::{
    Command, Endpoint, OtaCommand, PulseCommand, QueryCommand, StartupCommand, SwitchCommand,
    WifiCommand,
};
#[cfg(feature = "http")]
pub use device::HttpDeviceBuilder;
pub use device::Device;
pub use error::{ConnectionError, Error, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::Protocol;
pub use state::DeviceSnapshot;
pub use types::{PowerOnState, SignalStrength, SwitchState};

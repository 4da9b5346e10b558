// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Sonoff DIY device control.
//!
//! These types translate between the firmware vocabulary and a stable API.
//!
//! # Types
//!
//! - [`SwitchState`] - On/Off for the relay and pulse mode
//! - [`PowerOnState`] - Relay policy after reboot (Off/On/Restore)
//! - [`SignalStrength`] - Wi-Fi signal in dBm with a percentage view

mod power_on_state;
mod signal;
mod switch;

pub use power_on_state::PowerOnState;
pub use signal::SignalStrength;
pub use switch::SwitchState;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized view of the device state.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{PowerOnState, SignalStrength, SwitchState};

/// Raw field names used by the firmware in `info` and `signal_strength` data.
mod field {
    pub const SWITCH: &str = "switch";
    pub const OTA_UNLOCK: &str = "otaUnlock";
    pub const STARTUP: &str = "startup";
    pub const PULSE: &str = "pulse";
    pub const PULSE_WIDTH: &str = "pulseWidth";
    pub const SIGNAL_STRENGTH: &str = "signalStrength";
    pub const SSID: &str = "ssid";
}

/// Immutable snapshot of a device at the time it was fetched.
///
/// Built from the merged `info` and `signal_strength` payloads by
/// [`DeviceSnapshot::from_fields`]. Missing or mistyped fields fall back to
/// defaults, so building a snapshot never fails.
///
/// # Examples
///
/// ```
/// use sonoff_diy::state::DeviceSnapshot;
/// use sonoff_diy::types::PowerOnState;
///
/// let fields = serde_json::json!({
///     "switch": "on",
///     "startup": "stay",
///     "signalStrength": -60,
/// });
/// let snapshot = DeviceSnapshot::from_fields("100090ab1a", fields.as_object().unwrap());
///
/// assert!(snapshot.is_on());
/// assert_eq!(snapshot.power_on_state(), PowerOnState::Restore);
/// assert_eq!(snapshot.signal_strength_percent(), 80);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    device_id: String,
    is_on: bool,
    ota_unlock_enabled: bool,
    power_on_state: PowerOnState,
    pulse_width_ms: u32,
    pulse_enabled: bool,
    signal_strength_percent: u8,
    signal_strength_dbm: i32,
    ssid: String,
}

impl DeviceSnapshot {
    /// Normalizes raw device fields into a snapshot.
    #[must_use]
    pub fn from_fields(device_id: impl Into<String>, fields: &Map<String, Value>) -> Self {
        let signal = integer(fields, field::SIGNAL_STRENGTH).map_or(SignalStrength::NONE, |dbm| {
            // Clamp readings outside the i32 range.
            let dbm = i32::try_from(dbm).unwrap_or(if dbm < 0 { i32::MIN } else { i32::MAX });
            SignalStrength::from_dbm(dbm)
        });

        let power_on_state = fields
            .get(field::STARTUP)
            .and_then(Value::as_str)
            .map_or(PowerOnState::Off, PowerOnState::from_wire);

        let pulse_width_ms = integer(fields, field::PULSE_WIDTH)
            .and_then(|width| u32::try_from(width).ok())
            .unwrap_or(0);

        Self {
            device_id: device_id.into(),
            is_on: is_on(fields, field::SWITCH),
            ota_unlock_enabled: fields
                .get(field::OTA_UNLOCK)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            power_on_state,
            pulse_width_ms,
            pulse_enabled: is_on(fields, field::PULSE),
            signal_strength_percent: signal.percent(),
            signal_strength_dbm: signal.dbm(),
            ssid: fields
                .get(field::SSID)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Returns the device ID the snapshot belongs to.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns `true` if the relay is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Returns the relay state.
    #[must_use]
    pub fn switch_state(&self) -> SwitchState {
        SwitchState::from(self.is_on)
    }

    /// Returns `true` if the device accepts OTA flashing.
    #[must_use]
    pub fn ota_unlock_enabled(&self) -> bool {
        self.ota_unlock_enabled
    }

    /// Returns the relay policy after reboot.
    #[must_use]
    pub fn power_on_state(&self) -> PowerOnState {
        self.power_on_state
    }

    /// Returns the pulse (inching) duration in milliseconds.
    #[must_use]
    pub fn pulse_width_ms(&self) -> u32 {
        self.pulse_width_ms
    }

    /// Returns `true` if pulse mode is on.
    #[must_use]
    pub fn pulse_enabled(&self) -> bool {
        self.pulse_enabled
    }

    /// Returns pulse mode as a [`SwitchState`].
    #[must_use]
    pub fn pulse_state(&self) -> SwitchState {
        SwitchState::from(self.pulse_enabled)
    }

    /// Returns the signal quality in percent, `0..=100`.
    #[must_use]
    pub fn signal_strength_percent(&self) -> u8 {
        self.signal_strength_percent
    }

    /// Returns the signal strength in dBm.
    #[must_use]
    pub fn signal_strength_dbm(&self) -> i32 {
        self.signal_strength_dbm
    }

    /// Returns the signal strength.
    #[must_use]
    pub fn signal_strength(&self) -> SignalStrength {
        SignalStrength::from_dbm(self.signal_strength_dbm)
    }

    /// Returns the SSID of the network the device is connected to.
    #[must_use]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}

fn is_on(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_str) == Some(SwitchState::On.as_str())
}

/// Reads a numeric field, rounding fractional values.
#[allow(clippy::cast_possible_truncation)]
fn integer(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = fields.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.round() as i64)
    })
}

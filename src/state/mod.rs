// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state types.
//!
//! The firmware reports its state across two endpoints (`info` and
//! `signal_strength`) using its own field names and tokens. [`DeviceSnapshot`]
//! merges them into a stable, typed view.
//!
//! # Examples
//!
//! ```
//! use sonoff_diy::state::DeviceSnapshot;
//!
//! let fields = serde_json::json!({"switch": "off", "pulseWidth": 500});
//! let snapshot = DeviceSnapshot::from_fields("100090ab1a", fields.as_object().unwrap());
//!
//! assert!(!snapshot.is_on());
//! assert_eq!(snapshot.pulse_width_ms(), 500);
//! ```

mod snapshot;

pub use snapshot::DeviceSnapshot;

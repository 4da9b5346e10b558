// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wi-Fi signal strength.

use std::fmt;

/// Wi-Fi signal strength reported by the device, in dBm.
///
/// The percentage is a linear scale between -100 dBm (0%) and -50 dBm
/// (100%), clamped at both ends.
///
/// # Examples
///
/// ```
/// use sonoff_diy::types::SignalStrength;
///
/// assert_eq!(SignalStrength::from_dbm(-60).percent(), 80);
/// assert_eq!(SignalStrength::from_dbm(-48).percent(), 100);
/// assert_eq!(SignalStrength::NONE.percent(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalStrength(i32);

impl SignalStrength {
    /// Value at or below which there is no usable signal.
    pub const MIN_DBM: i32 = -100;
    /// Value at or above which the signal is considered perfect.
    pub const MAX_DBM: i32 = -50;
    /// Signal strength used when the device reports none.
    pub const NONE: Self = Self(Self::MIN_DBM);

    /// Wraps a raw dBm reading.
    #[must_use]
    pub const fn from_dbm(dbm: i32) -> Self {
        Self(dbm)
    }

    /// Returns the raw reading in dBm.
    #[must_use]
    pub const fn dbm(&self) -> i32 {
        self.0
    }

    /// Returns the signal quality as a percentage in `[0, 100]`.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        if self.0 <= Self::MIN_DBM {
            0
        } else if self.0 >= Self::MAX_DBM {
            100
        } else {
            // Range -99..=-51 maps to 2..=98.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let percent = (2 * (self.0 - Self::MIN_DBM)) as u8;
            percent
        }
    }
}

impl Default for SignalStrength {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dBm ({}%)", self.0, self.percent())
    }
}

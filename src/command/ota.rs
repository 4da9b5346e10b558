// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Over-the-air update commands.
//!
//! Flashing is a two step process on the device: it must first be unlocked
//! through the vendor service ([`OtaCommand::Unlock`]), then it downloads
//! and verifies the image itself ([`OtaCommand::Flash`]). Only the requests
//! are modelled here.

use serde_json::Value;

use crate::command::{Command, Endpoint, Payload};

/// Command for the OTA update flow.
///
/// # Examples
///
/// ```
/// use sonoff_diy::command::{Command, Endpoint, OtaCommand};
///
/// let flash = OtaCommand::flash("http://10.0.0.2/image.bin", "0123abcd");
/// assert_eq!(flash.endpoint(), Endpoint::OtaFlash);
/// assert_eq!(flash.payload()["downloadUrl"], "http://10.0.0.2/image.bin");
/// assert_eq!(flash.payload()["sha256sum"], "0123abcd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtaCommand {
    /// Unlock OTA updates.
    Unlock,
    /// Download and flash a firmware image.
    Flash {
        /// URL the device downloads the image from.
        download_url: String,
        /// SHA-256 of the image, hex encoded.
        sha256sum: String,
    },
}

impl OtaCommand {
    /// Creates a flash command.
    #[must_use]
    pub fn flash(download_url: impl Into<String>, sha256sum: impl Into<String>) -> Self {
        Self::Flash {
            download_url: download_url.into(),
            sha256sum: sha256sum.into(),
        }
    }
}

impl Command for OtaCommand {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::Unlock => Endpoint::OtaUnlock,
            Self::Flash { .. } => Endpoint::OtaFlash,
        }
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        if let Self::Flash {
            download_url,
            sha256sum,
        } = self
        {
            payload.insert(
                "downloadUrl".to_string(),
                Value::from(download_url.as_str()),
            );
            payload.insert("sha256sum".to_string(), Value::from(sha256sum.as_str()));
        }
        payload
    }
}

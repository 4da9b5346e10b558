// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request and response envelopes of the DIY-mode API.
//!
//! Requests wrap the command parameters with the device ID:
//!
//! ```json
//! {"deviceid": "100090ab1a", "data": {"switch": "on"}}
//! ```
//!
//! Responses carry a sequence number, an error code and optional data:
//!
//! ```json
//! {"seq": 26, "error": 0, "data": {"signalStrength": -48}}
//! ```
//!
//! Some firmware versions serialize `data` a second time and send it as a
//! JSON string. [`ResponseEnvelope::into_data`] undoes that.

use serde::Serialize;
use serde_json::Value;

use crate::command::Payload;
use crate::error::{ProtocolError, describe};

/// Body of a request to the device.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<'a> {
    #[serde(rename = "deviceid")]
    device_id: &'a str,
    data: &'a Payload,
}

impl<'a> RequestEnvelope<'a> {
    /// Wraps a payload for the given device.
    #[must_use]
    pub fn new(device_id: &'a str, data: &'a Payload) -> Self {
        Self { device_id, data }
    }
}

/// Decoded response from the device.
///
/// Construction validates the envelope: a response only becomes a
/// `ResponseEnvelope` when it is a JSON object whose `error` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    sequence: Option<i64>,
    error_code: i64,
    data: Option<Value>,
}

impl ResponseEnvelope {
    /// Returns the `seq` counter, if the device sent one.
    #[must_use]
    pub fn sequence(&self) -> Option<i64> {
        self.sequence
    }

    /// Returns the error code; always 0 for a validated envelope.
    #[must_use]
    pub fn error_code(&self) -> i64 {
        self.error_code
    }

    /// Returns the raw `data` member, as sent.
    #[must_use]
    pub fn raw_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the data, decoding it first if it was sent as a JSON string.
    ///
    /// A missing or `null` `data` member is not an error: many commands
    /// acknowledge with an envelope only.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidJson`] if `data` is a string that
    /// does not hold valid JSON.
    pub fn into_data(self) -> Result<Option<Value>, ProtocolError> {
        match self.data {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(encoded)) => serde_json::from_str(&encoded)
                .map(Some)
                .map_err(|source| ProtocolError::InvalidJson {
                    source,
                    body: encoded,
                }),
            Some(data) => Ok(Some(data)),
        }
    }
}

impl TryFrom<Value> for ResponseEnvelope {
    type Error = ProtocolError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = body else {
            return Err(ProtocolError::UnexpectedResponse { body });
        };

        let Some(error_code) = fields.get("error").and_then(Value::as_i64) else {
            return Err(ProtocolError::UnexpectedResponse {
                body: Value::Object(fields),
            });
        };

        if error_code != 0 {
            let message = describe(error_code);
            tracing::warn!(code = error_code, reason = message, "Device reported an error");
            return Err(ProtocolError::Device {
                code: error_code,
                message,
                body: Value::Object(fields),
            });
        }

        Ok(Self {
            sequence: fields.get("seq").and_then(Value::as_i64),
            error_code,
            data: fields.remove("data"),
        })
    }
}

impl std::str::FromStr for ResponseEnvelope {
    type Err = ProtocolError;

    /// Parses and validates a raw response body.
    fn from_str(body: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(body).map_err(|source| ProtocolError::InvalidJson {
                source,
                body: body.to_string(),
            })?;
        Self::try_from(value)
    }
}

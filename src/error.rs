// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `sonoff_diy` library.
//!
//! Failures fall into three categories:
//!
//! - [`ConnectionError`]: the HTTP exchange did not complete (timeout,
//!   refused connection, DNS failure, non-2xx status). Callers may retry.
//! - [`ProtocolError`]: the device answered, but the answer breaks the
//!   protocol contract or carries a non-zero error code.
//! - [`ValueError`]: a caller-supplied value was rejected before any
//!   request was made.
//!
//! The device reports failures as integer codes; [`describe`] turns them
//! into readable messages.

use serde_json::Value;
use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The request did not reach the device or no answer came back.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The device answered with something unexpected.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A value was rejected before being sent.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

impl Error {
    /// Returns `true` if repeating the request may succeed.
    ///
    /// Only transport failures qualify. The library never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Errors raised while talking to the device over the network.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The transport failed (connection refused, DNS failure, I/O error).
    #[cfg(feature = "http")]
    #[error("error occurred while communicating with device: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange did not finish within the configured timeout.
    #[error("timeout occurred while connecting to device after {0} ms")]
    Timeout(u64),

    /// The device answered with a non-success HTTP status.
    #[error("device responded with HTTP {status} {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// The configured address cannot be used.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors raised when the device response violates the protocol.
///
/// Every variant keeps what the device actually sent, for diagnostics.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The response was not declared as JSON.
    #[error("unexpected response from device (content type: {content_type:?})")]
    UnexpectedContentType {
        /// The `Content-Type` header as received, empty when missing.
        content_type: String,
        /// Raw response body.
        body: String,
    },

    /// The response body is JSON but lacks a usable `error` field.
    #[error("unexpected response from device: {body}")]
    UnexpectedResponse {
        /// The parsed response body.
        body: Value,
    },

    /// The device reported a non-zero error code.
    #[error("{message} (error {code})")]
    Device {
        /// Error code reported by the device.
        code: i64,
        /// Description of the code, see [`describe`].
        message: &'static str,
        /// The parsed response body.
        body: Value,
    },

    /// The body, or the JSON string nested in `data`, is not valid JSON.
    #[error("invalid JSON from device: {source}")]
    InvalidJson {
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
        /// The text that failed to parse.
        body: String,
    },

    /// A call that must carry data returned none.
    #[error("did not receive data from device")]
    NoData,

    /// The `data` payload has a shape the caller cannot use.
    #[error("unexpected data from device: {0}")]
    UnexpectedData(Value),
}

impl ProtocolError {
    /// Returns the device error code, if the device reported one.
    #[must_use]
    pub fn device_code(&self) -> Option<i64> {
        match self {
            Self::Device { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The power-on state is not one of `off`, `on` or `restore`.
    #[error("invalid startup value {0:?}, accepted: on, off, restore")]
    InvalidPowerOnState(String),

    /// The switch state is not `on` or `off`.
    #[error("invalid switch state {0:?}, accepted: on, off")]
    InvalidSwitchState(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Message used for codes missing from the device documentation.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Returns a human readable description of a device error code.
///
/// # Examples
///
/// ```
/// use sonoff_diy::error::describe;
///
/// assert_eq!(describe(403), "OTA function is locked");
/// assert_eq!(describe(999), "Unknown error occurred");
/// ```
#[must_use]
pub const fn describe(code: i64) -> &'static str {
    match code {
        400 => "Request body is not valid JSON",
        401 => "Unauthorized request",
        403 => "OTA function is locked",
        404 => "Device does not support requested Device ID",
        408 => "Timeout while downloading firmware",
        413 => "OTA firmware exceeds device allowed size limit",
        422 => "Invalid request parameters",
        424 => "Firmware download failed",
        471 => "Firmware integrity check failed",
        500 => "Device ID or API key is not authorized by vendor's OTA service",
        503 => "Could not connect to vendor's OTA unlock service",
        _ => UNKNOWN_ERROR,
    }
}

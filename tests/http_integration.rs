// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP protocol using wiremock.

use std::time::Duration;

use serde_json::json;
use sonoff_diy::command::QueryCommand;
use sonoff_diy::protocol::{HttpClient, HttpConfig, Protocol};
use sonoff_diy::types::PowerOnState;
use sonoff_diy::{ConnectionError, Device, Error, ProtocolError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DEVICE_ID: &str = "100090ab1a";

fn config_for(server: &MockServer) -> HttpConfig {
    HttpConfig::new(server.address().ip().to_string())
        .with_port(server.address().port())
        .with_device_id(DEVICE_ID)
}

fn client_for(server: &MockServer) -> HttpClient {
    config_for(server).into_client().unwrap()
}

fn device_for(server: &MockServer) -> Device<HttpClient> {
    Device::http_config(config_for(server))
        .build_without_probe()
        .unwrap()
}

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn header_is(name: &'static str, expected: String) -> impl Fn(&Request) -> bool {
    move |request: &Request| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            == Some(expected.as_str())
    }
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn json_data_is_returned() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/info"))
            .respond_with(json_response(
                r#"{"seq": 26, "error": 0, "data": {"test": "ok"}}"#,
            ))
            .mount(&server)
            .await;

        let data = client_for(&server)
            .send_command(&QueryCommand::Info)
            .await
            .unwrap();
        assert_eq!(data, Some(json!({"test": "ok"})));
    }

    #[tokio::test]
    async fn encoded_json_data_is_decoded() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/info"))
            .respond_with(json_response(
                r#"{"seq": 26, "error": 0, "data": "{\"test\": \"ok\"}"}"#,
            ))
            .mount(&server)
            .await;

        let data = client_for(&server)
            .send_command(&QueryCommand::Info)
            .await
            .unwrap();
        assert_eq!(data, Some(json!({"test": "ok"})));
    }

    #[tokio::test]
    async fn acknowledgement_without_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/switch"))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .mount(&server)
            .await;

        let data = client_for(&server)
            .send_raw("switch", serde_json::Map::new())
            .await
            .unwrap();
        assert_eq!(data, None);
    }

    #[tokio::test]
    async fn request_envelope_and_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/signal_strength"))
            .and(body_json(json!({"deviceid": DEVICE_ID, "data": {}})))
            .and(header_is(
                "user-agent",
                HttpConfig::DEFAULT_USER_AGENT.to_string(),
            ))
            .and(header_is("accept", "application/json, */*".to_string()))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .send_command(&QueryCommand::SignalStrength)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn custom_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header_is("user-agent", "LoremIpsum/1.0".to_string()))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = config_for(&server)
            .with_user_agent("LoremIpsum/1.0")
            .into_client()
            .unwrap();
        client.send_raw("/", serde_json::Map::new()).await.unwrap();
    }

    #[tokio::test]
    async fn supplied_session_is_used_and_kept() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .expect(2)
            .mount(&server)
            .await;

        let session = reqwest::Client::new();
        let client = config_for(&server)
            .with_session(session.clone())
            .into_client()
            .unwrap();

        client.send_raw("info", serde_json::Map::new()).await.unwrap();
        client.close();
        client.send_raw("info", serde_json::Map::new()).await.unwrap();
        assert!(client.has_open_session());
    }

    #[tokio::test]
    async fn timeout_is_a_connection_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                json_response(r#"{"seq": 1, "error": 0}"#).set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = config_for(&server)
            .with_timeout(Duration::from_millis(200))
            .into_client()
            .unwrap();

        let err = client.send_raw("info", serde_json::Map::new()).await.unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::Timeout(200))));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn refused_connection_is_a_connection_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = HttpConfig::new("127.0.0.1")
            .with_port(port)
            .into_client()
            .unwrap();

        let err = client.send_raw("info", serde_json::Map::new()).await.unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::Http(_))));
    }

    #[tokio::test]
    async fn invalid_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"seq": 26, "error": 0, "data": {"test": "ok"}}"#,
                "other/content",
            ))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_raw("info", serde_json::Map::new())
            .await
            .unwrap_err();

        match err {
            Error::Protocol(ProtocolError::UnexpectedContentType { content_type, body }) => {
                assert_eq!(content_type, "other/content");
                assert!(body.contains("\"test\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_error_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(json_response(r#"{"seq": 26, "data": {"test": "ok"}}"#))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_raw("info", serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn device_error_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(json_response(r#"{"seq": 26, "error": 422}"#))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_raw("info", serde_json::Map::new())
            .await
            .unwrap_err();

        match err {
            Error::Protocol(ProtocolError::Device {
                code,
                message,
                body,
            }) => {
                assert_eq!(code, 422);
                assert_eq!(message, "Invalid request parameters");
                assert_eq!(body, json!({"seq": 26, "error": 422}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_error_statuses() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("OMG PUPPIES!"))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/broken"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_raw(r#"{"seq": 1, "error": 0}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client
            .send_raw("missing", serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Status { status: 404, .. })
        ));

        let err = client
            .send_raw("broken", serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn invalid_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(json_response("Invalid response"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_raw("info", serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::InvalidJson { .. })
        ));
    }
}

// ============================================================================
// Device Tests
// ============================================================================

mod device {
    use super::*;

    async fn mount_info(server: &MockServer, info: &str, signal: &str) {
        Mock::given(method("POST"))
            .and(path("/zeroconf/info"))
            .and(body_json(json!({"deviceid": DEVICE_ID, "data": {}})))
            .respond_with(json_response(info))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/signal_strength"))
            .and(body_json(json!({"deviceid": DEVICE_ID, "data": {}})))
            .respond_with(json_response(signal))
            .mount(server)
            .await;
    }

    async fn expect_command(server: &MockServer, endpoint: &str, data: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/zeroconf/{endpoint}")))
            .and(body_json(json!({"deviceid": DEVICE_ID, "data": data})))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_snapshot() {
        let server = MockServer::start().await;
        // The firmware double-encodes the info data as a JSON string.
        let info = json!({
            "switch": "on",
            "startup": "stay",
            "pulse": "off",
            "pulseWidth": 1500,
            "ssid": "frenck",
            "otaUnlock": true
        });
        mount_info(
            &server,
            &json!({"seq": 6, "error": 0, "data": info.to_string()}).to_string(),
            r#"{"seq": 26, "error": 0, "data": {"signalStrength": -48}}"#,
        )
        .await;

        let device = device_for(&server);
        let snapshot = device.fetch_snapshot().await.unwrap();

        assert!(snapshot.is_on());
        assert_eq!(snapshot.power_on_state(), PowerOnState::Restore);
        assert!(!snapshot.pulse_enabled());
        assert_eq!(snapshot.pulse_width_ms(), 1500);
        assert_eq!(snapshot.ssid(), "frenck");
        assert!(snapshot.ota_unlock_enabled());
        assert_eq!(snapshot.signal_strength_dbm(), -48);
        assert_eq!(snapshot.signal_strength_percent(), 100);
        assert_eq!(device.snapshot(), Some(snapshot));
    }

    #[tokio::test]
    async fn fetch_snapshot_signal_strength() {
        for (dbm, percent) in [(-60, 80), (-100, 0)] {
            let server = MockServer::start().await;
            mount_info(
                &server,
                r#"{"seq": 6, "error": 0, "data": {}}"#,
                &format!(r#"{{"seq": 26, "error": 0, "data": {{"signalStrength": {dbm}}}}}"#),
            )
            .await;

            let snapshot = device_for(&server).fetch_snapshot().await.unwrap();
            assert_eq!(snapshot.signal_strength_dbm(), dbm);
            assert_eq!(snapshot.signal_strength_percent(), percent);
        }
    }

    #[tokio::test]
    async fn build_fetches_initial_snapshot() {
        let server = MockServer::start().await;
        mount_info(
            &server,
            r#"{"seq": 6, "error": 0, "data": {"switch": "off"}}"#,
            r#"{"seq": 26, "error": 0, "data": {"signalStrength": -75}}"#,
        )
        .await;

        let (device, snapshot) = Device::http_config(config_for(&server))
            .build()
            .await
            .unwrap();

        assert!(!snapshot.is_on());
        assert_eq!(snapshot.signal_strength_percent(), 50);
        assert_eq!(device.snapshot(), Some(snapshot));
    }

    #[tokio::test]
    async fn no_info_data() {
        let server = MockServer::start().await;
        mount_info(
            &server,
            r#"{"seq": 6, "error": 0}"#,
            r#"{"seq": 26, "error": 0, "data": {"signalStrength": -100}}"#,
        )
        .await;

        let device = device_for(&server);
        let err = device.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::NoData)));
        assert!(device.snapshot().is_none());
    }

    #[tokio::test]
    async fn http_error_leaves_no_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/info"))
            .respond_with(
                ResponseTemplate::new(500).set_body_raw("Invalid response", "application/json"),
            )
            .mount(&server)
            .await;

        let device = device_for(&server);
        assert!(device.fetch_snapshot().await.is_err());
        assert!(device.snapshot().is_none());
    }

    #[tokio::test]
    async fn signal_failure_clears_previous_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/info"))
            .respond_with(json_response(r#"{"seq": 6, "error": 0, "data": {"switch": "on"}}"#))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/signal_strength"))
            .respond_with(json_response(
                r#"{"seq": 26, "error": 0, "data": {"signalStrength": -60}}"#,
            ))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/signal_strength"))
            .respond_with(json_response(r#"{"seq": 27, "error": 401}"#))
            .mount(&server)
            .await;

        let device = device_for(&server);
        device.fetch_snapshot().await.unwrap();
        assert!(device.snapshot().is_some());

        let err = device.fetch_snapshot().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::Device { code: 401, .. })
        ));
        assert!(device.snapshot().is_none());
    }

    #[tokio::test]
    async fn switch_on_and_off() {
        let server = MockServer::start().await;
        expect_command(&server, "switch", json!({"switch": "on"})).await;
        expect_command(&server, "switch", json!({"switch": "off"})).await;

        let device = device_for(&server);
        device.turn_on().await.unwrap();
        device.turn_off().await.unwrap();
    }

    #[tokio::test]
    async fn pulse_on_off_and_width() {
        let server = MockServer::start().await;
        expect_command(&server, "pulse", json!({"pulse": "on"})).await;
        expect_command(&server, "pulse", json!({"pulse": "on", "pulse_width": 1500})).await;
        expect_command(&server, "pulse", json!({"pulse": "off"})).await;

        let device = device_for(&server);
        device.pulse_on(None).await.unwrap();
        device.pulse_on(Some(1500)).await.unwrap();
        device.pulse_off().await.unwrap();
    }

    #[tokio::test]
    async fn set_pulse_width_reads_pulse_state_first() {
        let server = MockServer::start().await;
        mount_info(
            &server,
            r#"{"seq": 6, "error": 0, "data": {"pulse": "on", "pulseWidth": 500}}"#,
            r#"{"seq": 26, "error": 0, "data": {"signalStrength": -60}}"#,
        )
        .await;
        expect_command(&server, "pulse", json!({"pulse": "on", "pulse_width": 2000})).await;

        device_for(&server).set_pulse_width(2000).await.unwrap();
    }

    #[tokio::test]
    async fn wifi() {
        let server = MockServer::start().await;
        expect_command(
            &server,
            "wifi",
            json!({"ssid": "frenck", "password": "choo-choo"}),
        )
        .await;

        device_for(&server)
            .set_wifi("frenck", "choo-choo")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ota_unlock_and_flash() {
        let server = MockServer::start().await;
        expect_command(&server, "ota_unlock", json!({})).await;
        expect_command(
            &server,
            "ota_flash",
            json!({"downloadUrl": "http://example.com/fw.bin", "sha256sum": "abc123"}),
        )
        .await;

        let device = device_for(&server);
        device.unlock_ota().await.unwrap();
        device
            .flash_ota("http://example.com/fw.bin", "abc123")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ota_locked_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/zeroconf/ota_flash"))
            .respond_with(json_response(r#"{"seq": 3, "error": 403}"#))
            .mount(&server)
            .await;

        let err = device_for(&server)
            .flash_ota("http://example.com/fw.bin", "abc123")
            .await
            .unwrap_err();

        match err {
            Error::Protocol(e) => {
                assert_eq!(e.device_code(), Some(403));
                assert_eq!(e.to_string(), "OTA function is locked (error 403)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn power_on_state() {
        let server = MockServer::start().await;
        expect_command(&server, "startup", json!({"startup": "on"})).await;
        expect_command(&server, "startup", json!({"startup": "off"})).await;
        expect_command(&server, "startup", json!({"startup": "stay"})).await;

        let device = device_for(&server);
        device.set_power_on_state(PowerOnState::On).await.unwrap();
        device.set_power_on_state(PowerOnState::Off).await.unwrap();
        device
            .set_power_on_state(PowerOnState::Restore)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_power_on_state_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(json_response(r#"{"seq": 1, "error": 0}"#))
            .expect(0)
            .mount(&server)
            .await;

        let parsed = "bogus".parse::<PowerOnState>();
        assert!(parsed.is_err());
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Value(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_releases_owned_session() {
        let server = MockServer::start().await;
        expect_command(&server, "switch", json!({"switch": "on"})).await;

        let device = device_for(&server);
        assert!(!device.protocol().has_open_session());

        device.turn_on().await.unwrap();
        assert!(device.protocol().has_open_session());

        device.close();
        assert!(!device.protocol().has_open_session());
    }
}

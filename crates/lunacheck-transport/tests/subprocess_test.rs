//! Transport tests against a stub `luna-send`
//!
//! A tiny shell script stands in for the real CLI so the spawn, parse,
//! timeout, and kill paths run for real without a luna bus.

#![cfg(unix)]

use lunacheck_transport::{ClientConfig, LunaSendBus, ServiceBus, TransportError};
use serde_json::json;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

/// Write an executable stub and return (tempdir guard, path)
fn stub_send(body: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("luna-send");
    {
        let mut file = std::fs::File::create(&path).expect("create stub");
        writeln!(file, "#!/bin/sh").expect("write shebang");
        file.write_all(body.as_bytes()).expect("write body");
    }
    let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub");
    let path = path.to_string_lossy().into_owned();
    (dir, path)
}

fn bus_for(path: &str) -> LunaSendBus {
    LunaSendBus::new(
        ClientConfig::new(path)
            .with_call_timeout(Duration::from_secs(2))
            .with_await_timeout(Duration::from_millis(500)),
    )
}

#[tokio::test]
async fn test_call_parses_single_response_line() {
    let (_dir, path) = stub_send("printf '{\"returnValue\":true,\"planeID\":1}\\n'\n");
    let bus = bus_for(&path);

    let response = bus.call("connect", json!({"sink": "MAIN"})).await.unwrap();
    assert_eq!(response["returnValue"], json!(true));
    assert_eq!(response["planeID"], json!(1));
}

#[tokio::test]
async fn test_call_failure_payload_is_returned_not_an_error() {
    let (_dir, path) =
        stub_send("printf '{\"returnValue\":false,\"errorCode\":4,\"errorText\":\"Invalid sink\"}\\n'\n");
    let bus = bus_for(&path);

    let response = bus.call("connect", json!({"sink": "NOPE"})).await.unwrap();
    assert_eq!(response["returnValue"], json!(false));
    assert_eq!(response["errorCode"], json!(4));
}

#[tokio::test]
async fn test_nonzero_exit_is_a_transport_error() {
    let (_dir, path) = stub_send("exit 3\n");
    let bus = bus_for(&path);

    let error = bus.call("getStatus", json!({})).await.unwrap_err();
    assert!(matches!(error, TransportError::ProcessFailed(_)));
}

#[tokio::test]
async fn test_empty_output_is_a_transport_error() {
    let (_dir, path) = stub_send("exit 0\n");
    let bus = bus_for(&path);

    let error = bus.call("getStatus", json!({})).await.unwrap_err();
    assert!(matches!(error, TransportError::EmptyResponse));
}

#[tokio::test]
async fn test_call_timeout_kills_the_process() {
    let (_dir, path) = stub_send("sleep 30\n");
    let bus = LunaSendBus::new(
        ClientConfig::new(&path).with_call_timeout(Duration::from_millis(100)),
    );

    let error = bus.call("getStatus", json!({})).await.unwrap_err();
    assert!(matches!(error, TransportError::Timeout(_)));
}

#[tokio::test]
async fn test_subscribe_streams_events_until_cancelled() {
    let (_dir, path) = stub_send(concat!(
        "printf '{\"returnValue\":true,\"subscribed\":true}\\n'\n",
        "printf '{\"returnValue\":true,\"video\":[{\"sink\":\"MAIN\",\"muted\":true}]}\\n'\n",
        "sleep 30\n",
    ));
    let bus = bus_for(&path);

    let subscription = bus.subscribe("getStatus", json!({})).await.unwrap();
    assert_eq!(subscription.first_response()["subscribed"], json!(true));

    let update = subscription
        .await_update_timeout(Duration::from_secs(1))
        .await
        .expect("event within timeout");
    assert_eq!(update["video"][0]["muted"], json!(true));

    subscription.cancel().await;
}

#[tokio::test]
async fn test_rejected_subscription_is_an_error() {
    let (_dir, path) = stub_send("printf '{\"returnValue\":false,\"errorCode\":3}\\n'\n");
    let bus = bus_for(&path);

    let error = bus.subscribe("getStatus", json!({})).await.unwrap_err();
    assert!(matches!(error, TransportError::SubscriptionRejected(_)));
}

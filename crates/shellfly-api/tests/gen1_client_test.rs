// Integration tests for `Gen1Client` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shellfly_api::{Credentials, Error, Gen1Client, HttpTransport, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(server: &MockServer, credentials: Option<Credentials>) -> Gen1Client {
    let transport = HttpTransport::new(&server.uri(), credentials, &TransportConfig::default())
        .expect("transport builds");
    Gen1Client::new(transport)
}

async fn setup() -> (MockServer, Gen1Client) {
    let server = MockServer::start().await;
    let client = client_for(&server, None);
    (server, client)
}

// ── Identity ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shelly_identity() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/shelly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "SHSW-1",
            "mac": "11:22:33:44:55:66",
            "auth": false,
            "fw": "1.10.0"
        })))
        .mount(&server)
        .await;

    let identity = client.info().await.expect("identity");
    assert_eq!(identity.model, "SHSW-1");
    assert_eq!(identity.app, "SHSW-1");
    assert_eq!(identity.mac, "11:22:33:44:55:66");
    assert_eq!(identity.firmware, "1.10.0");
    assert!(!identity.auth_enabled);
}

// ── Relay ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_relay_turn_on() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/relay/0"))
        .and(query_param("turn", "on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ison": true,
            "has_timer": false
        })))
        .mount(&server)
        .await;

    let status = client.relay(0).on().await.expect("turn on");
    assert!(status.is_on);
}

#[tokio::test]
async fn test_relay_timer_is_seconds() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/relay/1"))
        .and(query_param("turn", "on"))
        .and(query_param("timer", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ison": true,
            "has_timer": true,
            "timer_remaining": 5.0
        })))
        .mount(&server)
        .await;

    let status = client.relay(1).turn_on_for(5.0).await.expect("timed on");
    assert!(status.has_timer);
}

#[tokio::test]
async fn test_relay_negative_index_fails_without_io() {
    let (server, client) = setup().await;

    let err = client
        .relay(-3)
        .toggle()
        .await
        .expect_err("negative index must fail");
    assert!(matches!(err.root(), Error::InvalidComponentId { id: -3 }));

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

// ── Roller ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_roller_open_with_duration() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/roller/0"))
        .and(query_param("go", "open"))
        .and(query_param("duration", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "open",
            "current_pos": 20,
            "power": 96.0
        })))
        .mount(&server)
        .await;

    let status = client.roller(0).open(Some(3.0)).await.expect("open");
    assert_eq!(status.state, "open");
    assert_eq!(status.current_pos, Some(20));
}

#[tokio::test]
async fn test_roller_go_to_position() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/roller/0"))
        .and(query_param("go", "to_pos"))
        .and(query_param("roller_pos", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "close",
            "current_pos": 60
        })))
        .mount(&server)
        .await;

    let status = client.roller(0).go_to_position(42).await.expect("goto");
    assert_eq!(status.current_pos, Some(60));

    // The request reached /roller/<id> with a non-empty query.
    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests[0].url.path(), "/roller/0");
    assert!(requests[0].url.query().is_some_and(|q| !q.is_empty()));
}

// ── Light / color / white ───────────────────────────────────────────

#[tokio::test]
async fn test_light_brightness_implies_turn_on() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/light/0"))
        .and(query_param("turn", "on"))
        .and(query_param("brightness", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ison": true,
            "brightness": 60
        })))
        .mount(&server)
        .await;

    let status = client.light(0).set_brightness(60).await.expect("set");
    assert!(status.is_on);
    assert_eq!(status.brightness, Some(60.0));
}

#[tokio::test]
async fn test_color_set_sends_rgb_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/color/0"))
        .and(query_param("turn", "on"))
        .and(query_param("red", "255"))
        .and(query_param("green", "100"))
        .and(query_param("blue", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ison": true,
            "mode": "color",
            "red": 255, "green": 100, "blue": 0
        })))
        .mount(&server)
        .await;

    let status = client.color(0).set_color(255, 100, 0).await.expect("set");
    assert!(status.is_on);
    assert_eq!(status.red, Some(255));
}

#[tokio::test]
async fn test_white_set_brightness() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/white/0"))
        .and(query_param("turn", "on"))
        .and(query_param("brightness", "75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ison": true,
            "brightness": 75
        })))
        .mount(&server)
        .await;

    let status = client.white(0).set(None, Some(75)).await.expect("set");
    assert_eq!(status.brightness, Some(75.0));
}

// ── Status document ─────────────────────────────────────────────────

#[tokio::test]
async fn test_status_decodes_component_arrays() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "relays": [ { "ison": true, "has_timer": false } ],
            "meters": [ { "power": 48.5, "is_valid": true, "total": 91037.0 } ],
            "inputs": [ { "input": 0, "event": "", "event_cnt": 0 } ],
            "uptime": 86400,
            "has_update": false
        })))
        .mount(&server)
        .await;

    let status = client.status().await.expect("status");
    assert_eq!(status.relays.len(), 1);
    assert!(status.relays[0].is_on);
    assert_eq!(status.meters[0].power, 48.5);
    assert_eq!(status.uptime, Some(86400));
}

// ── Device-level paths ──────────────────────────────────────────────

#[tokio::test]
async fn test_reboot_and_ota_paths() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reboot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ota"))
        .and(query_param("url", "http://example.com/fw.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "updating",
            "has_update": false,
            "new_version": "",
            "old_version": "1.10.0"
        })))
        .mount(&server)
        .await;

    client.reboot().await.expect("reboot");
    let ota = client.ota("http://example.com/fw.zip").await.expect("ota");
    assert_eq!(ota.status, "updating");
}

// ── Auth & error classification ─────────────────────────────────────

#[tokio::test]
async fn test_basic_auth_attached_on_every_call() {
    let server = MockServer::start().await;
    let client = client_for(&server, Some(Credentials::new("admin", "secret")));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "relays": [] })))
        .mount(&server)
        .await;

    client.status().await.expect("status");
    client.settings().await.expect("settings");

    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let auth = request.headers.get("authorization").expect("auth header");
        assert!(auth.to_str().expect("ascii").starts_with("Basic "));
    }
}

#[tokio::test]
async fn test_401_maps_to_auth_required() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.status().await.expect_err("401 expected");
    assert!(err.is_auth());
    assert!(err.to_string().contains("authentication required"));
    assert!(err.to_string().contains("/status"));
}

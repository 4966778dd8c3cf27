// Integration tests for `Gen2Client` using wiremock.

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use shellfly_api::gen2_models::{ComponentQuery, CoverState};
use shellfly_api::{ComponentKind, Credentials, Error, Gen2Client, HttpTransport, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(server: &MockServer, credentials: Option<Credentials>) -> Gen2Client {
    let transport = HttpTransport::new(&server.uri(), credentials, &TransportConfig::default())
        .expect("transport builds");
    Gen2Client::new(transport)
}

async fn setup() -> (MockServer, Gen2Client) {
    let server = MockServer::start().await;
    let client = client_for(&server, None);
    (server, client)
}

/// Responds with a success envelope, echoing the request id.
struct RpcOk(Value);

impl Respond for RpcOk {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let id = body.get("id").and_then(Value::as_u64).unwrap_or(0);
        ResponseTemplate::new(200).set_body_json(json!({ "id": id, "result": self.0 }))
    }
}

/// Responds with an error envelope, echoing the request id.
struct RpcErr {
    code: i64,
    message: &'static str,
}

impl Respond for RpcErr {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let id = body.get("id").and_then(Value::as_u64).unwrap_or(0);
        ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "error": { "code": self.code, "message": self.message }
        }))
    }
}

async fn rpc_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap_or_default())
        .collect()
}

// ── Identity ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_info_identity() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Shelly.GetDeviceInfo" })))
        .respond_with(RpcOk(json!({
            "id": "shellyplus1pm-test123",
            "mac": "AA:BB:CC:DD:EE:FF",
            "model": "SNSW-001P16EU",
            "gen": 2,
            "fw_id": "20231107-164738/1.0.0-g1234567",
            "ver": "1.0.0",
            "app": "Plus1PM",
            "auth_en": false
        })))
        .mount(&server)
        .await;

    let identity = client.info().await.expect("identity fetch");
    assert_eq!(identity.id, "shellyplus1pm-test123");
    assert_eq!(identity.mac, "AA:BB:CC:DD:EE:FF");
    assert_eq!(identity.model, "SNSW-001P16EU");
    assert_eq!(identity.app, "Plus1PM");
    assert_eq!(identity.firmware, "1.0.0");
    assert!(!identity.auth_enabled);

    // Second call answers from the cache — still one wire round-trip.
    let again = client.info().await.expect("cached identity");
    assert_eq!(again, identity);
    assert_eq!(rpc_bodies(&server).await.len(), 1);
}

// ── Switch semantics ────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_set_returns_previous_state() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Switch.Set" })))
        .respond_with(RpcOk(json!({ "was_on": true })))
        .mount(&server)
        .await;

    let was_on = client.switch(0).set(false).await.expect("set succeeds");
    assert!(was_on);

    let bodies = rpc_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["params"], json!({ "id": 0, "on": false }));
}

#[tokio::test]
async fn test_toggle_inverts_was_on() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Switch.Toggle" })))
        .respond_with(RpcOk(json!({ "was_on": true })))
        .mount(&server)
        .await;

    let status = client.switch(0).toggle().await.expect("toggle succeeds");
    assert!(!status.output);

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Switch.Toggle" })))
        .respond_with(RpcOk(json!({ "was_on": false })))
        .mount(&server)
        .await;

    let status = client.switch(0).toggle().await.expect("toggle succeeds");
    assert!(status.output);
}

#[tokio::test]
async fn test_turn_on_for_duration_uses_toggle_after() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcOk(json!({ "was_on": false })))
        .mount(&server)
        .await;

    client.switch(1).turn_on_for(30.0).await.expect("timed set");

    let bodies = rpc_bodies(&server).await;
    assert_eq!(
        bodies[0]["params"],
        json!({ "id": 1, "on": true, "toggle_after": 30.0 })
    );
}

#[tokio::test]
async fn test_negative_index_fails_without_io() {
    let (server, client) = setup().await;

    let err = client
        .switch(-1)
        .get_status()
        .await
        .expect_err("negative index must fail");
    assert!(matches!(err.root(), Error::InvalidComponentId { id: -1 }));
    assert!(err.to_string().starts_with("switch:-1"));

    // Nothing reached the wire.
    assert!(rpc_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_index_beyond_id_range_fails_without_io() {
    let (server, client) = setup().await;

    let too_big = i64::from(u32::MAX) + 1;
    let err = client
        .switch(too_big)
        .toggle()
        .await
        .expect_err("unrepresentable index must fail");
    match err.root() {
        Error::InvalidComponentId { id } => assert_eq!(*id, too_big),
        other => panic!("expected InvalidComponentId, got {other:?}"),
    }

    assert!(rpc_bodies(&server).await.is_empty());
}

// ── Reboot param rule (S6) ──────────────────────────────────────────

#[tokio::test]
async fn test_reboot_sends_delay_only_when_positive() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Shelly.Reboot" })))
        .respond_with(RpcOk(Value::Null))
        .mount(&server)
        .await;

    client.reboot(5000).await.expect("reboot with delay");
    client.reboot(0).await.expect("immediate reboot");
    client.reboot(-1).await.expect("negative treated as immediate");

    let bodies = rpc_bodies(&server).await;
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["params"], json!({ "delay_ms": 5000 }));
    assert!(bodies[1].get("params").is_none());
    assert!(bodies[2].get("params").is_none());
}

// ── Cover status (S5) ───────────────────────────────────────────────

#[tokio::test]
async fn test_cover_status_normalizes_position() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Cover.GetStatus" })))
        .respond_with(RpcOk(json!({
            "id": 0,
            "state": "stopped",
            "source": "button",
            "current_pos": 75,
            "target_pos": 75,
            "apower": 0,
            "voltage": 230.0,
            "current": 0,
            "pos_control": true
        })))
        .mount(&server)
        .await;

    let status = client.cover(0).get_status().await.expect("cover status");
    assert_eq!(status.state, CoverState::Stopped);
    assert_eq!(status.current_pos, Some(75));
    assert_eq!(status.target_pos, Some(75));
    assert_eq!(status.voltage, Some(230.0));
}

// ── Light composite set ─────────────────────────────────────────────

#[tokio::test]
async fn test_set_brightness_implies_on() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcOk(Value::Null))
        .mount(&server)
        .await;

    client.light(0).set_brightness(40).await.expect("set");

    let bodies = rpc_bodies(&server).await;
    assert_eq!(
        bodies[0]["params"],
        json!({ "id": 0, "on": true, "brightness": 40 })
    );
}

#[tokio::test]
async fn test_explicit_off_with_brightness_is_honored() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcOk(Value::Null))
        .mount(&server)
        .await;

    client
        .rgbw(0)
        .set(&shellfly_api::gen2::components::RgbwSet {
            on: Some(false),
            brightness: Some(70),
            rgb: Some([10, 20, 30]),
            white: Some(5),
            ..Default::default()
        })
        .await
        .expect("set");

    let bodies = rpc_bodies(&server).await;
    assert_eq!(
        bodies[0]["params"],
        json!({
            "id": 0, "on": false, "brightness": 70,
            "rgb": [10, 20, 30], "white": 5
        })
    );
}

// ── Pagination (property 7) ─────────────────────────────────────────

/// Serves `total` switch components in pages of `page_size`.
struct ComponentPager {
    total: usize,
    page_size: usize,
}

impl Respond for ComponentPager {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let id = body.get("id").and_then(Value::as_u64).unwrap_or(0);
        let offset = body["params"]
            .get("offset")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;

        let end = (offset + self.page_size).min(self.total);
        let components: Vec<Value> = (offset..end)
            .map(|i| json!({ "key": format!("switch:{i}") }))
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "result": {
                "components": components,
                "offset": offset,
                "total": self.total
            }
        }))
    }
}

#[tokio::test]
async fn test_pagination_terminates_with_all_items_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Shelly.GetComponents" })))
        .respond_with(ComponentPager {
            total: 5,
            page_size: 2,
        })
        .mount(&server)
        .await;

    let all = client
        .get_components_all(&ComponentQuery::default())
        .await
        .expect("pagination");

    assert_eq!(all.len(), 5);
    for (i, component) in all.iter().enumerate() {
        assert_eq!(component.key, format!("switch:{i}"));
    }
    // ⌈5/2⌉ = 3 calls, no more.
    assert_eq!(rpc_bodies(&server).await.len(), 3);
}

#[tokio::test]
async fn test_pagination_forwards_optional_params_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ComponentPager {
            total: 3,
            page_size: 2,
        })
        .mount(&server)
        .await;

    let query = ComponentQuery {
        dynamic_only: Some(false),
        include_status: Some(true),
        ..ComponentQuery::default()
    };
    client.get_components_all(&query).await.expect("pagination");

    let bodies = rpc_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    for body in &bodies {
        assert_eq!(body["params"]["dynamic_only"], json!(false));
        assert_eq!(body["params"]["include_status"], json!(true));
    }
    // The paginator owns offset: absent on the first call, set after.
    assert!(bodies[0]["params"].get("offset").is_none());
    assert_eq!(bodies[1]["params"]["offset"], json!(2));
}

#[tokio::test]
async fn test_empty_inventory_terminates_immediately() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ComponentPager {
            total: 0,
            page_size: 10,
        })
        .mount(&server)
        .await;

    let all = client
        .get_components_all(&ComponentQuery::default())
        .await
        .expect("pagination");
    assert!(all.is_empty());
    assert_eq!(rpc_bodies(&server).await.len(), 1);
}

// ── Inventory filtering (S4) ────────────────────────────────────────

#[tokio::test]
async fn test_list_components_skips_service_keys() {
    let (server, client) = setup().await;

    let keys = ["switch:0", "switch:1", "input:0", "cover:0", "light:0", "sys", "wifi:sta"];
    let components: Vec<Value> = keys.iter().map(|k| json!({ "key": k })).collect();

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Shelly.GetComponents" })))
        .respond_with(RpcOk(json!({
            "components": components,
            "offset": 0,
            "total": keys.len()
        })))
        .mount(&server)
        .await;

    let inventory = client.list_components().await.expect("inventory");
    assert_eq!(inventory.len(), 5);

    let switches = client
        .filter_components(ComponentKind::Switch)
        .await
        .expect("filter");
    assert_eq!(switches.len(), 2);
}

// ── Error surfaces ──────────────────────────────────────────────────

#[tokio::test]
async fn test_rpc_error_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcErr {
            code: -103,
            message: "Invalid argument 'id'!",
        })
        .mount(&server)
        .await;

    let err = client
        .switch(9)
        .get_status()
        .await
        .expect_err("rpc error expected");
    assert_eq!(err.rpc_code(), Some(-103));
    assert!(err.to_string().contains("switch:9"));
    assert!(err.to_string().contains("Invalid argument"));
}

#[tokio::test]
async fn test_http_status_classification() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_status().await.expect_err("401 expected");
    assert!(err.is_auth());
    assert!(err.to_string().contains("authentication required"));
}

#[tokio::test]
async fn test_type_mismatch_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Switch.GetStatus" })))
        .respond_with(RpcOk(json!({ "id": 0, "output": "yes" })))
        .mount(&server)
        .await;

    let err = client
        .switch(0)
        .get_status()
        .await
        .expect_err("string output must not decode as bool");
    assert!(matches!(err.root(), Error::Decode { .. }));
}

// ── Auth passthrough (property 4) ───────────────────────────────────

#[tokio::test]
async fn test_credentials_attach_basic_auth() {
    let server = MockServer::start().await;
    let client = client_for(&server, Some(Credentials::new("admin", "hunter2")));

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcOk(json!({})))
        .mount(&server)
        .await;

    client.get_status().await.expect("call succeeds");

    let requests = server.received_requests().await.expect("recorded");
    let auth = requests[0].headers.get("authorization");
    let value = auth.expect("authorization header present");
    assert!(value.to_str().expect("ascii").starts_with("Basic "));
}

#[tokio::test]
async fn test_empty_username_sends_no_auth_header() {
    let server = MockServer::start().await;
    let client = client_for(&server, Some(Credentials::new("", "ignored")));

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(RpcOk(json!({})))
        .mount(&server)
        .await;

    client.get_status().await.expect("call succeeds");

    let requests = server.received_requests().await.expect("recorded");
    assert!(requests[0].headers.get("authorization").is_none());
}

// ── KVS ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_kvs_round_trip() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "KVS.Set" })))
        .respond_with(RpcOk(json!({ "etag": "0DyqTA", "rev": 7 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "KVS.List" })))
        .respond_with(RpcOk(json!({
            "keys": { "greeting": { "etag": "0DyqTA" } },
            "rev": 7
        })))
        .mount(&server)
        .await;

    let set = client
        .kvs()
        .set("greeting", json!("hello"))
        .await
        .expect("kvs set");
    assert_eq!(set.rev, 7);

    let list = client.kvs().list().await.expect("kvs list");
    assert_eq!(list.rev, 7);
    assert!(list.keys.contains_key("greeting"));
}

// Gen2 JSON-RPC client.
//
// Every operation is `POST /rpc` with `{"id", "method", "params"}`.
// The envelope is unwrapped here: `result` is handed to the caller
// (typed via a from_value round-trip), `error` becomes `Error::Rpc`.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::components::{Cover, Input, Kvs, Light, Rgb, Rgbw, Switch, Thermostat};
use super::models::{
    ComponentPage, ComponentQuery, SetConfigResult, UpdateInfo,
};
use crate::component::{ComponentEntry, ComponentKind, RawComponent, parse_inventory};
use crate::error::Error;
use crate::identity::{DeviceIdentity, Gen2DeviceInfo};
use crate::transport::{Credentials, HttpTransport, TransportConfig};

#[derive(Serialize)]
struct RpcRequest<'a> {
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(serde::Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(serde::Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Async client for a second-generation device.
///
/// Component accessors (`switch(0)`, `cover(1)`, ...) are free: they
/// perform no I/O and accept any index. Invalid indices surface on the
/// first operation.
pub struct Gen2Client {
    transport: HttpTransport,
    next_id: AtomicU64,
    identity: OnceLock<DeviceIdentity>,
}

impl Gen2Client {
    /// Wrap an existing transport. No I/O.
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            identity: OnceLock::new(),
        }
    }

    /// Build a transport for `address` and verify the device answers the
    /// RPC identity call.
    pub async fn connect(
        address: &str,
        credentials: Option<Credentials>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = HttpTransport::new(address, credentials, config)?;
        let client = Self::new(transport);
        client.info().await?;
        Ok(client)
    }

    /// Wrap a transport with a pre-fetched identity (detection flow).
    pub fn with_identity(transport: HttpTransport, identity: DeviceIdentity) -> Self {
        let client = Self::new(transport);
        let _ = client.identity.set(identity);
        client
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Release the transport and its keep-alive connections. Idempotent
    /// by construction — dropping does the same.
    pub fn close(self) {}

    // ── RPC machinery ────────────────────────────────────────────────

    /// Raw escape hatch: invoke any RPC method, returning the bare
    /// `result` fragment.
    pub async fn call_raw(&self, method: &str, params: Option<Value>) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest { id, method, params };
        debug!(method, id, "rpc call");

        let body = self
            .transport
            .post_json("rpc", &request)
            .await
            .map_err(|e| e.with_operation(method))?;

        let envelope: RpcEnvelope = serde_json::from_slice(&body).map_err(|e| {
            crate::error::decode_error(&e, &String::from_utf8_lossy(&body))
                .with_operation(method)
        })?;

        if let Some(err) = envelope.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            }
            .with_operation(method));
        }

        if envelope.id != id {
            return Err(Error::Decode {
                message: format!("response id {} does not match request id {id}", envelope.id),
            }
            .with_operation(method));
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }

    /// Typed call: unwrap the envelope, then remarshal `result` into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, Error> {
        let result = self.call_raw(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            Error::Decode {
                message: e.to_string(),
            }
            .with_operation(method)
        })
    }

    /// Call for methods whose result the caller discards.
    pub(crate) async fn call_void(&self, method: &str, params: Option<Value>) -> Result<(), Error> {
        self.call_raw(method, params).await.map(|_| ())
    }

    // ── Device-level operations ──────────────────────────────────────

    /// Cached normalized identity; fetched on first use.
    pub async fn info(&self) -> Result<DeviceIdentity, Error> {
        if let Some(identity) = self.identity.get() {
            return Ok(identity.clone());
        }
        let raw = self.device_info().await?;
        let identity = DeviceIdentity::from(raw);
        let _ = self.identity.set(identity.clone());
        Ok(identity)
    }

    /// `Shelly.GetDeviceInfo`, raw wire shape.
    pub async fn device_info(&self) -> Result<Gen2DeviceInfo, Error> {
        self.call("Shelly.GetDeviceInfo", None).await
    }

    /// `Shelly.GetStatus` — the full status map, keyed by component.
    pub async fn get_status(&self) -> Result<Map<String, Value>, Error> {
        self.call("Shelly.GetStatus", None).await
    }

    /// `Shelly.GetConfig` — the full config map, keyed by component.
    pub async fn get_config(&self) -> Result<Map<String, Value>, Error> {
        self.call("Shelly.GetConfig", None).await
    }

    /// `Shelly.SetConfig` with a full or partial config map.
    pub async fn set_config(&self, config: Map<String, Value>) -> Result<SetConfigResult, Error> {
        self.call("Shelly.SetConfig", Some(json!({ "config": config })))
            .await
    }

    /// `Shelly.Reboot`. `delay_ms` is sent only when strictly positive;
    /// zero or negative means reboot immediately.
    pub async fn reboot(&self, delay_ms: i64) -> Result<(), Error> {
        let params = (delay_ms > 0).then(|| json!({ "delay_ms": delay_ms }));
        self.call_void("Shelly.Reboot", params).await
    }

    /// `Shelly.FactoryReset`. No confirmation here — callers own that.
    pub async fn factory_reset(&self) -> Result<(), Error> {
        self.call_void("Shelly.FactoryReset", None).await
    }

    /// `Shelly.CheckForUpdate`.
    pub async fn check_for_update(&self) -> Result<UpdateInfo, Error> {
        self.call("Shelly.CheckForUpdate", None).await
    }

    /// `Shelly.Update` — issue the OTA request. `stage` selects the
    /// release channel; `url` installs a specific image instead.
    pub async fn update(&self, stage: Option<&str>, url: Option<&str>) -> Result<(), Error> {
        let mut params = Map::new();
        if let Some(stage) = stage {
            params.insert("stage".into(), json!(stage));
        }
        if let Some(url) = url {
            params.insert("url".into(), json!(url));
        }
        let params = (!params.is_empty()).then(|| Value::Object(params));
        self.call_void("Shelly.Update", params).await
    }

    // ── Component inventory ──────────────────────────────────────────

    /// One page of `Shelly.GetComponents`. Optional query fields are
    /// forwarded verbatim.
    pub async fn get_components(&self, query: &ComponentQuery) -> Result<ComponentPage, Error> {
        let params = serde_json::to_value(query).map_err(|e| Error::Decode {
            message: e.to_string(),
        })?;
        self.call("Shelly.GetComponents", Some(params)).await
    }

    /// All pages of `Shelly.GetComponents`, accumulated in encounter
    /// order. The paginator owns `offset`; the caller's other query
    /// fields are forwarded unchanged on every page.
    pub async fn get_components_all(
        &self,
        query: &ComponentQuery,
    ) -> Result<Vec<RawComponent>, Error> {
        let mut all = Vec::new();
        let mut page_query = query.clone();

        loop {
            let page = self.get_components(&page_query).await?;
            let received = page.components.len();
            let offset = page.offset as usize;
            all.extend(page.components);

            if page.total == 0 || received == 0 || offset + received >= page.total as usize {
                break;
            }
            page_query.offset = Some(u32::try_from(all.len()).unwrap_or(u32::MAX));
        }

        Ok(all)
    }

    /// The typed component inventory: one `Shelly.GetComponents` call
    /// with empty params, unknown keys skipped.
    pub async fn list_components(&self) -> Result<Vec<ComponentEntry>, Error> {
        let page = self.get_components(&ComponentQuery::default()).await?;
        Ok(parse_inventory(page.components))
    }

    /// The inventory filtered to a single kind.
    pub async fn filter_components(
        &self,
        kind: ComponentKind,
    ) -> Result<Vec<ComponentEntry>, Error> {
        let mut entries = self.list_components().await?;
        entries.retain(|e| e.key.kind == kind);
        Ok(entries)
    }

    // ── Component accessors (no I/O) ─────────────────────────────────

    pub fn switch(&self, id: i64) -> Switch<'_> {
        Switch::new(self, id)
    }

    pub fn cover(&self, id: i64) -> Cover<'_> {
        Cover::new(self, id)
    }

    pub fn light(&self, id: i64) -> Light<'_> {
        Light::new(self, id)
    }

    pub fn rgb(&self, id: i64) -> Rgb<'_> {
        Rgb::new(self, id)
    }

    pub fn rgbw(&self, id: i64) -> Rgbw<'_> {
        Rgbw::new(self, id)
    }

    pub fn input(&self, id: i64) -> Input<'_> {
        Input::new(self, id)
    }

    pub fn thermostat(&self, id: i64) -> Thermostat<'_> {
        Thermostat::new(self, id)
    }

    /// The device-level key-value store.
    pub fn kvs(&self) -> Kvs<'_> {
        Kvs::new(self)
    }
}

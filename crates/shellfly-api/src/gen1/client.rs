// Gen1 REST client.
//
// Every operation is a single `GET <path>?<k=v&...>` round-trip with a
// JSON response. Component accessors mirror the Gen2 client but use the
// first-generation channel names (relay, roller, light, color, white).

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::components::{Color, Gen1Light, Relay, Roller, White};
use super::models::{Gen1OtaStatus, Gen1Status};
use crate::error::Error;
use crate::identity::{DeviceIdentity, Gen1DeviceInfo};
use crate::transport::{Credentials, HttpTransport, TransportConfig};

/// Async client for a first-generation device.
///
/// Accessors perform no I/O; invalid indices surface on the first
/// operation, wrapped with the channel identity (`"relay:0: ..."`).
pub struct Gen1Client {
    transport: HttpTransport,
    identity: OnceLock<DeviceIdentity>,
}

impl Gen1Client {
    /// Wrap an existing transport. No I/O.
    pub fn new(transport: HttpTransport) -> Self {
        Self {
            transport,
            identity: OnceLock::new(),
        }
    }

    /// Build a transport for `address` and verify the device answers
    /// the `/shelly` identity call.
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

    /// Release the transport and its keep-alive connections.
    pub fn close(self) {}

    // ── Request helper ───────────────────────────────────────────────

    /// `GET <path>?<query>`, decoded as `T`. Errors carry the path.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let body = self
            .transport
            .get(path, query)
            .await
            .map_err(|e| e.with_operation(format!("/{path}")))?;

        serde_json::from_slice(&body).map_err(|e| {
            crate::error::decode_error(&e, &String::from_utf8_lossy(&body))
                .with_operation(format!("/{path}"))
        })
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

    /// `GET /shelly`, raw wire shape.
    pub async fn device_info(&self) -> Result<Gen1DeviceInfo, Error> {
        self.get_json("shelly", &[]).await
    }

    /// `GET /status` — the typed status document.
    pub async fn status(&self) -> Result<Gen1Status, Error> {
        self.get_json("status", &[]).await
    }

    /// `GET /status` as a raw keyed map, for callers that want the
    /// device's exact shape.
    pub async fn status_raw(&self) -> Result<Map<String, Value>, Error> {
        self.get_json("status", &[]).await
    }

    /// `GET /settings` — the device settings document, unparsed.
    pub async fn settings(&self) -> Result<Map<String, Value>, Error> {
        self.get_json("settings", &[]).await
    }

    /// `GET /reboot`.
    pub async fn reboot(&self) -> Result<(), Error> {
        let _: Value = self.get_json("reboot", &[]).await?;
        Ok(())
    }

    /// `GET /reset` — factory reset. No confirmation here.
    pub async fn factory_reset(&self) -> Result<(), Error> {
        let _: Value = self.get_json("reset", &[]).await?;
        Ok(())
    }

    /// `GET /settings/actions` — the action-hook table.
    pub async fn actions(&self) -> Result<Value, Error> {
        self.get_json("settings/actions", &[]).await
    }

    /// Write action-hook fields via query params
    /// (`index=0&name=out_on_url&enabled=true&urls[]=...`).
    pub async fn set_action(&self, params: &[(&str, String)]) -> Result<Value, Error> {
        self.get_json("settings/actions", params).await
    }

    /// `GET /ota?url=...` — point the device at a firmware image.
    pub async fn ota(&self, url: &str) -> Result<Gen1OtaStatus, Error> {
        self.get_json("ota", &[("url", url.to_owned())]).await
    }

    /// `GET /ota/check` — ask the device to poll for updates.
    pub async fn ota_check(&self) -> Result<Value, Error> {
        self.get_json("ota/check", &[]).await
    }

    /// `GET /debug/log` — the device's debug log tail, as plain text.
    pub async fn debug_log(&self) -> Result<String, Error> {
        let body = self
            .transport
            .get("debug/log", &[])
            .await
            .map_err(|e| e.with_operation("/debug/log"))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Raw escape hatch: `GET` any path with any query, returning the
    /// device's JSON fragment.
    pub async fn call(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        debug!(path, "raw gen1 call");
        self.get_json(path.trim_start_matches('/'), query).await
    }

    // ── Channel accessors (no I/O) ───────────────────────────────────

    pub fn relay(&self, id: i64) -> Relay<'_> {
        Relay::new(self, id)
    }

    pub fn roller(&self, id: i64) -> Roller<'_> {
        Roller::new(self, id)
    }

    pub fn light(&self, id: i64) -> Gen1Light<'_> {
        Gen1Light::new(self, id)
    }

    pub fn color(&self, id: i64) -> Color<'_> {
        Color::new(self, id)
    }

    pub fn white(&self, id: i64) -> White<'_> {
        White::new(self, id)
    }
}

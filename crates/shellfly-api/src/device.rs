// ── Unified device client ──
//
// Callers that only need the shared capability set (identity, raw call,
// status, config, reboot, inventory) hold a `ShellyClient` and never
// branch on the dialect. Per-kind operations stay on the concrete
// clients — the dialects genuinely diverge there (Gen1 has no RGBW).

use serde_json::{Map, Value};

use crate::component::{ComponentEntry, ComponentKey, ComponentKind};
use crate::detect::detect_with_transport;
use crate::error::Error;
use crate::gen1::Gen1Client;
use crate::gen2::Gen2Client;
use crate::identity::{DeviceIdentity, Generation};
use crate::transport::{Credentials, HttpTransport, TransportConfig};

/// A device client of either generation.
pub enum ShellyClient {
    Gen1(Gen1Client),
    Gen2(Gen2Client),
}

impl ShellyClient {
    /// Detect the device's dialect, then construct the matching client.
    ///
    /// One transport is built and reused for the probes and the client,
    /// so the detection identity is cached — no extra round-trip.
    pub async fn connect(
        address: &str,
        credentials: Option<Credentials>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = HttpTransport::new(address, credentials, config)?;
        let identity = detect_with_transport(&transport).await?;
        Ok(match identity.generation {
            Generation::Gen1 => Self::Gen1(Gen1Client::with_identity(transport, identity)),
            Generation::Gen2 => Self::Gen2(Gen2Client::with_identity(transport, identity)),
        })
    }

    /// Connect to a device known to be first-generation; skips detection.
    pub async fn connect_gen1(
        address: &str,
        credentials: Option<Credentials>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self::Gen1(
            Gen1Client::connect(address, credentials, config).await?,
        ))
    }

    /// Connect to a device known to be second-generation; skips detection.
    pub async fn connect_gen2(
        address: &str,
        credentials: Option<Credentials>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self::Gen2(
            Gen2Client::connect(address, credentials, config).await?,
        ))
    }

    pub fn generation(&self) -> Generation {
        match self {
            Self::Gen1(_) => Generation::Gen1,
            Self::Gen2(_) => Generation::Gen2,
        }
    }

    /// The concrete Gen1 client, when this device speaks dialect A.
    pub fn as_gen1(&self) -> Option<&Gen1Client> {
        match self {
            Self::Gen1(client) => Some(client),
            Self::Gen2(_) => None,
        }
    }

    /// The concrete Gen2 client, when this device speaks dialect B.
    pub fn as_gen2(&self) -> Option<&Gen2Client> {
        match self {
            Self::Gen2(client) => Some(client),
            Self::Gen1(_) => None,
        }
    }

    // ── Shared capability set ────────────────────────────────────────

    /// The normalized identity (cached after the first fetch).
    pub async fn info(&self) -> Result<DeviceIdentity, Error> {
        match self {
            Self::Gen1(client) => client.info().await,
            Self::Gen2(client) => client.info().await,
        }
    }

    /// Raw escape hatch. For Gen2, `target` is an RPC method name and
    /// `params` its parameter object; for Gen1, `target` is a path
    /// (query included if needed) and `params` is ignored.
    pub async fn call(&self, target: &str, params: Option<Value>) -> Result<Value, Error> {
        match self {
            Self::Gen1(client) => client.call(target, &[]).await,
            Self::Gen2(client) => client.call_raw(target, params).await,
        }
    }

    /// The full status map: `/status` for Gen1, `Shelly.GetStatus` for
    /// Gen2. Keys follow each dialect's own naming.
    pub async fn status(&self) -> Result<Map<String, Value>, Error> {
        match self {
            Self::Gen1(client) => client.status_raw().await,
            Self::Gen2(client) => client.get_status().await,
        }
    }

    /// The full config map: `/settings` for Gen1, `Shelly.GetConfig`
    /// for Gen2.
    pub async fn config(&self) -> Result<Map<String, Value>, Error> {
        match self {
            Self::Gen1(client) => client.settings().await,
            Self::Gen2(client) => client.get_config().await,
        }
    }

    /// Reboot the device. `delay_ms` is honored on Gen2 (sent only when
    /// strictly positive); Gen1 firmware reboots immediately.
    pub async fn reboot(&self, delay_ms: i64) -> Result<(), Error> {
        match self {
            Self::Gen1(client) => client.reboot().await,
            Self::Gen2(client) => client.reboot(delay_ms).await,
        }
    }

    /// Factory reset. Dangerous; confirmation is the caller's problem.
    pub async fn factory_reset(&self) -> Result<(), Error> {
        match self {
            Self::Gen1(client) => client.factory_reset().await,
            Self::Gen2(client) => client.factory_reset().await,
        }
    }

    /// The typed component inventory.
    ///
    /// Gen2 devices enumerate via `Shelly.GetComponents`; Gen1 devices
    /// have no inventory call, so their `/status` arrays are mapped to
    /// the canonical kinds (relays → switch, rollers → cover,
    /// lights → light).
    pub async fn list_components(&self) -> Result<Vec<ComponentEntry>, Error> {
        match self {
            Self::Gen2(client) => client.list_components().await,
            Self::Gen1(client) => {
                let status = client.status().await?;
                let mut entries = Vec::new();
                let kinds = [
                    (ComponentKind::Switch, status.relays.len()),
                    (ComponentKind::Cover, status.rollers.len()),
                    (ComponentKind::Light, status.lights.len()),
                ];
                for (kind, count) in kinds {
                    for index in 0..count {
                        entries.push(ComponentEntry {
                            key: ComponentKey::new(kind, u32::try_from(index).unwrap_or_default()),
                            status: None,
                            config: None,
                        });
                    }
                }
                Ok(entries)
            }
        }
    }

    /// The inventory filtered to one kind.
    pub async fn filter_components(
        &self,
        kind: ComponentKind,
    ) -> Result<Vec<ComponentEntry>, Error> {
        let mut entries = self.list_components().await?;
        entries.retain(|e| e.key.kind == kind);
        Ok(entries)
    }

    /// Release the transport and its keep-alive connections.
    pub fn close(self) {
        match self {
            Self::Gen1(client) => client.close(),
            Self::Gen2(client) => client.close(),
        }
    }
}

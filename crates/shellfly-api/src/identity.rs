// ── Normalized device identity ──
//
// Both probe payloads (Gen1 `/shelly`, Gen2 `Shelly.GetDeviceInfo`)
// collapse into one identity shape. Raw wire structs live here too so
// the detector and the clients share a single decode path.

use serde::Deserialize;
use std::fmt;

/// Which wire dialect a device speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// First generation: RESTful paths + query strings.
    Gen1,
    /// Second generation and later: JSON-RPC over HTTP.
    Gen2,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gen1 => write!(f, "gen1"),
            Self::Gen2 => write!(f, "gen2"),
        }
    }
}

/// Normalized identity for a device of either generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Device id string (Gen2; empty for Gen1 devices).
    pub id: String,
    pub mac: String,
    pub model: String,
    pub generation: Generation,
    pub firmware: String,
    /// Application/device type (`Plus1PM`, `SHSW-1`, ...).
    pub app: String,
    pub auth_enabled: bool,
}

// ── Wire payloads ───────────────────────────────────────────────────

/// Raw `Shelly.GetDeviceInfo` payload (Gen2 probe).
#[derive(Debug, Clone, Deserialize)]
pub struct Gen2DeviceInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub r#gen: Option<i64>,
    #[serde(default)]
    pub fw_id: String,
    #[serde(default)]
    pub ver: String,
    #[serde(default)]
    pub app: String,
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub dev_type: String,
    #[serde(default)]
    pub auth_en: bool,
}

impl Gen2DeviceInfo {
    /// Firmware string: `ver` when present, else the full `fw_id`.
    pub fn firmware(&self) -> &str {
        if self.ver.is_empty() {
            &self.fw_id
        } else {
            &self.ver
        }
    }

    /// Device type: first non-empty of `app`, `type`, `dev_type`.
    pub fn app_name(&self) -> &str {
        [&self.app, &self.device_type, &self.dev_type]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("", String::as_str)
    }
}

impl From<Gen2DeviceInfo> for DeviceIdentity {
    fn from(raw: Gen2DeviceInfo) -> Self {
        let firmware = raw.firmware().to_owned();
        let app = raw.app_name().to_owned();
        Self {
            id: raw.id,
            mac: raw.mac,
            model: raw.model,
            generation: Generation::Gen2,
            firmware,
            app,
            auth_enabled: raw.auth_en,
        }
    }
}

/// Raw `/shelly` payload (Gen1 probe).
#[derive(Debug, Clone, Deserialize)]
pub struct Gen1DeviceInfo {
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub fw: String,
    /// Gen1 firmware omits this; a value ≥ 2 means the `/shelly`
    /// endpoint belongs to a newer device and the probe is rejected.
    #[serde(default)]
    pub r#gen: Option<i64>,
}

impl From<Gen1DeviceInfo> for DeviceIdentity {
    fn from(raw: Gen1DeviceInfo) -> Self {
        Self {
            id: String::new(),
            mac: raw.mac,
            // Gen1 has no separate model field; the type string is both.
            model: raw.device_type.clone(),
            generation: Generation::Gen1,
            firmware: raw.fw,
            app: raw.device_type,
            auth_enabled: raw.auth,
        }
    }
}

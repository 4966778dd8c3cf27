// Typed payloads for the Gen1 REST surface.
//
// Gen1 firmware reports booleans like `ison` and flat meter arrays;
// field names here follow that wire format. `shellfly-core` remaps
// these into the normalized component snapshots.

use serde::Deserialize;

/// `/relay/<id>` response and the per-relay entries of `/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1RelayStatus {
    #[serde(default, rename = "ison")]
    pub is_on: bool,
    #[serde(default)]
    pub has_timer: bool,
    #[serde(default)]
    pub timer_remaining: Option<f64>,
    #[serde(default)]
    pub overpower: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
}

/// `/roller/<id>` response and the per-roller entries of `/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1RollerStatus {
    /// `"open"`, `"close"`, or `"stop"` — the current motion.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub power: Option<f64>,
    /// 0–100; -1 while uncalibrated.
    #[serde(default)]
    pub current_pos: Option<i32>,
    #[serde(default)]
    pub calibrating: Option<bool>,
    #[serde(default)]
    pub positioning: Option<bool>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub last_direction: Option<String>,
}

/// `/light/<id>`, `/color/<id>`, `/white/<id>` responses and the
/// per-channel entries of `/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1LightStatus {
    #[serde(default, rename = "ison")]
    pub is_on: bool,
    #[serde(default)]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub red: Option<u8>,
    #[serde(default)]
    pub green: Option<u8>,
    #[serde(default)]
    pub blue: Option<u8>,
    /// White channel; color devices report 0–255 here, white-mode
    /// channels use `brightness` instead.
    #[serde(default)]
    pub white: Option<f64>,
    #[serde(default)]
    pub gain: Option<f64>,
    /// `"color"` or `"white"` on dual-mode devices.
    #[serde(default)]
    pub mode: Option<String>,
}

/// One entry of the `/status` `meters` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1Meter {
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub is_valid: bool,
    /// Total energy in W·min.
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub counters: Vec<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// One entry of the `/status` `emeters` array (energy-meter models).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1EMeter {
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub pf: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub is_valid: bool,
}

/// One entry of the `/status` `inputs` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1InputStatus {
    /// 0 or 1.
    #[serde(default)]
    pub input: i64,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub event_cnt: i64,
}

/// The `/status` document. Only the component arrays and a few
/// device-level scalars are typed; everything else stays on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1Status {
    #[serde(default)]
    pub relays: Vec<Gen1RelayStatus>,
    #[serde(default)]
    pub rollers: Vec<Gen1RollerStatus>,
    #[serde(default)]
    pub lights: Vec<Gen1LightStatus>,
    #[serde(default)]
    pub meters: Vec<Gen1Meter>,
    #[serde(default)]
    pub emeters: Vec<Gen1EMeter>,
    #[serde(default)]
    pub inputs: Vec<Gen1InputStatus>,
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub overtemperature: Option<bool>,
    #[serde(default)]
    pub has_update: Option<bool>,
}

/// `/ota` and `/ota/check` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1OtaStatus {
    /// `"idle"`, `"pending"`, `"updating"`, or `"unknown"`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub has_update: bool,
    #[serde(default)]
    pub new_version: String,
    #[serde(default)]
    pub old_version: String,
}

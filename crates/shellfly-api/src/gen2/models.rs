// Typed payloads for the Gen2 JSON-RPC surface.
//
// Field names follow the wire format; decoding always goes through
// `serde_json::from_value`, so serde attributes are the source of truth
// and a shape mismatch surfaces as a decode error, never a zero value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::RawComponent;

// ── Shared fragments ────────────────────────────────────────────────

/// Accumulated energy counters (`aenergy` / `ret_aenergy`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EnergyCounters {
    /// Total energy in Wh.
    #[serde(default)]
    pub total: f64,
    /// Energy per minute for the last three minutes, in mWh.
    #[serde(default)]
    pub by_minute: Vec<f64>,
    /// Unix timestamp of the start of the current minute.
    #[serde(default)]
    pub minute_ts: Option<i64>,
}

/// Internal temperature readout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Temperature {
    #[serde(default, rename = "tC")]
    pub celsius: Option<f64>,
    #[serde(default, rename = "tF")]
    pub fahrenheit: Option<f64>,
}

/// Result of `Shelly.SetConfig` and the per-component `SetConfig` calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetConfigResult {
    #[serde(default)]
    pub restart_required: bool,
}

/// Result of `Switch.Set`, `Switch.Toggle`, `Light.Toggle`, etc.
#[derive(Debug, Clone, Deserialize)]
pub struct WasOn {
    pub was_on: bool,
}

// ── Switch ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub output: bool,
    #[serde(default)]
    pub source: Option<String>,
    /// Instantaneous active power in W; absent on non-PM models.
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
    #[serde(default)]
    pub temperature: Option<Temperature>,
    /// Unix timestamp at which a running auto-off/on timer fires.
    #[serde(default)]
    pub timer_started_at: Option<f64>,
    #[serde(default)]
    pub timer_duration: Option<f64>,
}

/// Power-on behavior of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InitialState {
    Off,
    On,
    RestoreLast,
    MatchInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial_state: Option<InitialState>,
    #[serde(default)]
    pub auto_on: Option<bool>,
    #[serde(default)]
    pub auto_on_delay: Option<f64>,
    #[serde(default)]
    pub auto_off: Option<bool>,
    #[serde(default)]
    pub auto_off_delay: Option<f64>,
}

// ── Cover ───────────────────────────────────────────────────────────

/// Motion state of a cover.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CoverState {
    Open,
    Closed,
    Opening,
    Closing,
    Stopped,
    Calibrating,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverStatus {
    #[serde(default)]
    pub id: u32,
    pub state: CoverState,
    #[serde(default)]
    pub source: Option<String>,
    /// 0–100, or -1 while uncalibrated; absent when position control
    /// is unavailable.
    #[serde(default)]
    pub current_pos: Option<i32>,
    #[serde(default)]
    pub target_pos: Option<i32>,
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
    #[serde(default)]
    pub move_timeout: Option<f64>,
    #[serde(default)]
    pub pos_control: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub maxtime_open: Option<f64>,
    #[serde(default)]
    pub maxtime_close: Option<f64>,
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub invert_directions: Option<bool>,
}

// ── Light / RGB / RGBW ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub output: bool,
    #[serde(default)]
    pub source: Option<String>,
    /// 0–100, absent on on/off-only channels.
    #[serde(default)]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub auto_on: Option<bool>,
    #[serde(default)]
    pub auto_on_delay: Option<f64>,
    #[serde(default)]
    pub auto_off: Option<bool>,
    #[serde(default)]
    pub auto_off_delay: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RgbStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub output: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub brightness: Option<f64>,
    /// `[r, g, b]`, each 0–255.
    #[serde(default)]
    pub rgb: Option<[u8; 3]>,
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RgbwStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub output: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub rgb: Option<[u8; 3]>,
    /// White channel, 0–100.
    #[serde(default)]
    pub white: Option<f64>,
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
}

// ── Input ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputStatus {
    #[serde(default)]
    pub id: u32,
    /// Logical state for switch/button inputs; absent for analog.
    #[serde(default)]
    pub state: Option<bool>,
    /// Analog inputs report a percentage instead of a state.
    #[serde(default)]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub input_type: Option<String>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub invert: Option<bool>,
}

// ── Thermostat ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThermostatStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub enable: bool,
    #[serde(default, rename = "target_C")]
    pub target_c: Option<f64>,
    #[serde(default, rename = "current_C")]
    pub current_c: Option<f64>,
    /// Whether the actuator output is currently driven.
    #[serde(default)]
    pub output: Option<bool>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub schedule_active: Option<bool>,
    #[serde(default)]
    pub boost_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThermostatConfig {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, rename = "target_C_min")]
    pub target_c_min: Option<f64>,
    #[serde(default, rename = "target_C_max")]
    pub target_c_max: Option<f64>,
}

// ── Power meters ────────────────────────────────────────────────────

/// Dedicated single-phase power meter component (`pm1:<id>`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PmStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub apower: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub freq: Option<f64>,
    #[serde(default)]
    pub aenergy: Option<EnergyCounters>,
}

/// Three-phase energy meter (`em:<id>`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub total_act_power: Option<f64>,
    #[serde(default)]
    pub a_act_power: Option<f64>,
    #[serde(default)]
    pub b_act_power: Option<f64>,
    #[serde(default)]
    pub c_act_power: Option<f64>,
    #[serde(default)]
    pub total_current: Option<f64>,
}

/// Single-phase leg of a multi-channel meter (`em1:<id>`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Em1Status {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub act_power: Option<f64>,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
}

// ── KVS ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvsKeyInfo {
    #[serde(default)]
    pub etag: String,
}

/// Result of `KVS.List`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvsList {
    #[serde(default)]
    pub keys: BTreeMap<String, KvsKeyInfo>,
    #[serde(default)]
    pub rev: u64,
}

/// Result of `KVS.Get`.
#[derive(Debug, Clone, Deserialize)]
pub struct KvsValue {
    #[serde(default)]
    pub etag: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KvsItem {
    pub key: String,
    #[serde(default)]
    pub etag: Option<String>,
    pub value: Value,
}

/// Result of `KVS.GetMany`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvsGetMany {
    #[serde(default)]
    pub items: Vec<KvsItem>,
    #[serde(default)]
    pub rev: Option<u64>,
}

/// Result of `KVS.Set`.
#[derive(Debug, Clone, Deserialize)]
pub struct KvsSetResult {
    #[serde(default)]
    pub etag: String,
    #[serde(default)]
    pub rev: u64,
}

/// Result of `KVS.Delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct KvsDeleteResult {
    #[serde(default)]
    pub rev: u64,
}

// ── Firmware update ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirmwareVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub build_id: String,
}

/// Result of `Shelly.CheckForUpdate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInfo {
    #[serde(default)]
    pub stable: Option<FirmwareVersion>,
    #[serde(default)]
    pub beta: Option<FirmwareVersion>,
}

// ── Component inventory ─────────────────────────────────────────────

/// Optional parameters for `Shelly.GetComponents`. All fields are
/// forwarded verbatim; `None` fields are omitted from the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_config: Option<bool>,
}

/// One page of the `Shelly.GetComponents` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentPage {
    #[serde(default)]
    pub components: Vec<RawComponent>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

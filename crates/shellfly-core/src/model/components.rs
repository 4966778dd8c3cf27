// Normalized per-component snapshots.
//
// Every nullable wire scalar stays an `Option` — "absent" and "zero"
// are different answers, and the dashboard renders them differently.

use shellfly_api::gen2_models::{CoverState, EnergyCounters};

/// Normalized switch/relay state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchSnapshot {
    pub id: u32,
    pub output: bool,
    pub apower: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub energy: Option<EnergyCounters>,
}

/// Normalized cover/roller state.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverSnapshot {
    pub id: u32,
    pub state: CoverState,
    /// 0–100, or -1 while uncalibrated.
    pub current_pos: Option<i32>,
    pub target_pos: Option<i32>,
    pub apower: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub move_timeout: Option<f64>,
}

/// Normalized light state, shared by plain, RGB, and RGBW channels.
/// `rgb` and `white` stay `None` for kinds that lack those channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSnapshot {
    pub id: u32,
    pub output: bool,
    /// 0–100.
    pub brightness: Option<u8>,
    /// `[r, g, b]`, each 0–255.
    pub rgb: Option<[u8; 3]>,
    /// White channel, 0–100.
    pub white: Option<u8>,
    pub apower: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
}

/// Normalized input state (switch/button kinds).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub id: u32,
    pub state: Option<bool>,
}

/// Normalized thermostat state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermostatSnapshot {
    pub id: u32,
    pub enable: bool,
    pub target_c: Option<f64>,
    pub current_c: Option<f64>,
    pub output: Option<bool>,
    pub mode: Option<String>,
    pub schedule_active: Option<bool>,
    pub boost_minutes: Option<u32>,
}

/// Dedicated power-meter channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PmSnapshot {
    pub id: u32,
    pub apower: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub energy_total: Option<f64>,
}

/// Three-phase energy meter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmSnapshot {
    pub id: u32,
    pub total_act_power: Option<f64>,
    pub total_current: Option<f64>,
}

/// Single-phase energy-meter leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Em1Snapshot {
    pub id: u32,
    pub act_power: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
}

// ── Wire-to-domain conversion ──
//
// Both dialects' status documents collapse into `DeviceSnapshot`.
// Decoding goes through `serde_json::from_value`, so the wire structs'
// serde attributes govern field names and a shape mismatch fails
// instead of producing zeros.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;

use shellfly_api::gen1_models::Gen1Status;
use shellfly_api::gen2_models::{
    CoverState, CoverStatus, Em1Status, EmStatus, InputStatus, LightStatus, PmStatus, RgbStatus,
    RgbwStatus, SwitchStatus, ThermostatStatus,
};

use crate::model::{
    CoverSnapshot, DeviceSnapshot, Em1Snapshot, EmSnapshot, InputSnapshot, LightSnapshot,
    PmSnapshot, SwitchSnapshot, ThermostatSnapshot,
};

// ── Gen2 ────────────────────────────────────────────────────────────

/// Build a snapshot from a `Shelly.GetStatus` map.
///
/// Keys that are not component-shaped (`sys`, `wifi`, `cloud`, ...)
/// are skipped. Entries that *are* component-shaped but fail to decode
/// are skipped with a trace line — one odd component must not blank
/// the whole device.
pub fn snapshot_from_gen2(status: &Map<String, Value>) -> DeviceSnapshot {
    let mut snapshot = DeviceSnapshot::default();

    for (key, value) in status {
        let Some(prefix) = component_prefix(key) else {
            continue;
        };

        match prefix {
            "switch" => {
                if let Some(s) = decode::<SwitchStatus>(key, value) {
                    snapshot.switches.push(SwitchSnapshot {
                        id: s.id,
                        output: s.output,
                        apower: s.apower,
                        voltage: s.voltage,
                        current: s.current,
                        energy: s.aenergy,
                    });
                }
            }
            "cover" => {
                if let Some(c) = decode::<CoverStatus>(key, value) {
                    snapshot.covers.push(CoverSnapshot {
                        id: c.id,
                        state: c.state,
                        current_pos: c.current_pos,
                        target_pos: c.target_pos,
                        apower: c.apower,
                        voltage: c.voltage,
                        current: c.current,
                        move_timeout: c.move_timeout,
                    });
                }
            }
            "light" => {
                if let Some(l) = decode::<LightStatus>(key, value) {
                    snapshot.lights.push(LightSnapshot {
                        id: l.id,
                        output: l.output,
                        brightness: l.brightness.map(to_percent),
                        rgb: None,
                        white: None,
                        apower: l.apower,
                        voltage: l.voltage,
                        current: l.current,
                    });
                }
            }
            "rgb" => {
                if let Some(l) = decode::<RgbStatus>(key, value) {
                    snapshot.rgbs.push(LightSnapshot {
                        id: l.id,
                        output: l.output,
                        brightness: l.brightness.map(to_percent),
                        rgb: l.rgb,
                        white: None,
                        apower: l.apower,
                        voltage: l.voltage,
                        current: l.current,
                    });
                }
            }
            "rgbw" => {
                if let Some(l) = decode::<RgbwStatus>(key, value) {
                    snapshot.rgbws.push(LightSnapshot {
                        id: l.id,
                        output: l.output,
                        brightness: l.brightness.map(to_percent),
                        rgb: l.rgb,
                        white: l.white.map(to_percent),
                        apower: l.apower,
                        voltage: l.voltage,
                        current: l.current,
                    });
                }
            }
            "input" => {
                if let Some(i) = decode::<InputStatus>(key, value) {
                    snapshot.inputs.push(InputSnapshot {
                        id: i.id,
                        state: i.state,
                    });
                }
            }
            "thermostat" => {
                if let Some(t) = decode::<ThermostatStatus>(key, value) {
                    snapshot.thermostats.push(ThermostatSnapshot {
                        id: t.id,
                        enable: t.enable,
                        target_c: t.target_c,
                        current_c: t.current_c,
                        output: t.output,
                        mode: t.mode,
                        schedule_active: t.schedule_active,
                        boost_minutes: t.boost_minutes,
                    });
                }
            }
            "pm1" => {
                if let Some(p) = decode::<PmStatus>(key, value) {
                    snapshot.pms.push(PmSnapshot {
                        id: p.id,
                        apower: p.apower,
                        voltage: p.voltage,
                        current: p.current,
                        energy_total: p.aenergy.map(|e| e.total),
                    });
                }
            }
            "em" => {
                if let Some(e) = decode::<EmStatus>(key, value) {
                    snapshot.ems.push(EmSnapshot {
                        id: e.id,
                        total_act_power: e.total_act_power,
                        total_current: e.total_current,
                    });
                }
            }
            "em1" => {
                if let Some(e) = decode::<Em1Status>(key, value) {
                    snapshot.em1s.push(Em1Snapshot {
                        id: e.id,
                        act_power: e.act_power,
                        voltage: e.voltage,
                        current: e.current,
                    });
                }
            }
            _ => {}
        }
    }

    sort_snapshot(&mut snapshot);
    snapshot
}

// ── Gen1 ────────────────────────────────────────────────────────────

/// Build a snapshot from a Gen1 `/status` document.
///
/// Relays consume the `meters` array by index (a Shelly 1PM reports
/// its relay power there, not inline); bulb-style devices pair lights
/// with meters the same way. Leftover meters become standalone PM
/// entries, `emeters` become per-phase EM1 entries.
pub fn snapshot_from_gen1(status: &Gen1Status) -> DeviceSnapshot {
    let mut snapshot = DeviceSnapshot::default();
    let mut meters_used = 0usize;

    for (index, relay) in status.relays.iter().enumerate() {
        let meter = status.meters.get(index);
        meters_used = meters_used.max(index + 1);
        snapshot.switches.push(SwitchSnapshot {
            id: to_id(index),
            output: relay.is_on,
            apower: meter.map(|m| m.power),
            voltage: None,
            current: None,
            energy: None,
        });
    }

    for (index, roller) in status.rollers.iter().enumerate() {
        snapshot.covers.push(CoverSnapshot {
            id: to_id(index),
            state: roller_state(&roller.state, roller.calibrating),
            current_pos: roller.current_pos,
            target_pos: None,
            apower: roller.power,
            voltage: None,
            current: None,
            move_timeout: None,
        });
    }

    for (index, light) in status.lights.iter().enumerate() {
        let meter = if status.relays.is_empty() {
            meters_used = meters_used.max(index + 1);
            status.meters.get(index)
        } else {
            None
        };

        let rgb = match (light.red, light.green, light.blue) {
            (Some(r), Some(g), Some(b)) => Some([r, g, b]),
            _ => None,
        };
        let entry = LightSnapshot {
            id: to_id(index),
            output: light.is_on,
            brightness: light.brightness.map(to_percent),
            rgb,
            white: light.white.map(to_percent),
            apower: meter.map(|m| m.power),
            voltage: None,
            current: None,
        };

        // Color-mode channels land in the RGB groups; the white channel
        // decides between rgb and rgbw.
        if rgb.is_some() {
            if entry.white.is_some() {
                snapshot.rgbws.push(entry);
            } else {
                snapshot.rgbs.push(entry);
            }
        } else {
            snapshot.lights.push(entry);
        }
    }

    for (index, input) in status.inputs.iter().enumerate() {
        snapshot.inputs.push(InputSnapshot {
            id: to_id(index),
            state: Some(input.input != 0),
        });
    }

    for (index, meter) in status.meters.iter().enumerate().skip(meters_used) {
        snapshot.pms.push(PmSnapshot {
            id: to_id(index),
            apower: Some(meter.power),
            voltage: None,
            current: None,
            energy_total: meter.total,
        });
    }

    for (index, emeter) in status.emeters.iter().enumerate() {
        snapshot.em1s.push(Em1Snapshot {
            id: to_id(index),
            act_power: Some(emeter.power),
            voltage: emeter.voltage,
            current: emeter.current,
        });
    }

    snapshot
}

/// Gen1 roller `state` is the current motion, not a position claim.
fn roller_state(state: &str, calibrating: Option<bool>) -> CoverState {
    if calibrating == Some(true) {
        return CoverState::Calibrating;
    }
    match state {
        "open" => CoverState::Opening,
        "close" => CoverState::Closing,
        _ => CoverState::Stopped,
    }
}

// ── Model heuristics ────────────────────────────────────────────────

/// Whether a model string belongs to a known power-metering family.
///
/// Used when a device is offline or its snapshot is empty: the ring
/// only samples PM-capable devices, and the snapshot alone can't tell
/// once the device stops answering.
pub fn is_pm_model(model: &str) -> bool {
    let model = model.to_ascii_uppercase();

    if model.contains("-PM") {
        return true;
    }
    if ["SNDM-", "SPEM-", "SNEM-"].iter().any(|p| model.starts_with(p)) {
        return true;
    }
    // Plus/Pro switch families encode power metering as a P in the
    // variant suffix: SNSW-001P16EU, SPSW-204PE16EU.
    ["SNSW-", "SPSW-"].iter().any(|p| {
        model
            .strip_prefix(p)
            .is_some_and(|variant| variant.contains('P'))
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            trace!(key, error = %e, "skipping undecodable component status");
            None
        }
    }
}

/// `"switch:0"` → `"switch"`; `None` for service keys without a
/// decimal index.
fn component_prefix(key: &str) -> Option<&str> {
    let (prefix, digits) = key.split_once(':')?;
    digits.parse::<u32>().ok()?;
    Some(prefix)
}

fn sort_snapshot(snapshot: &mut DeviceSnapshot) {
    snapshot.switches.sort_by_key(|s| s.id);
    snapshot.covers.sort_by_key(|c| c.id);
    snapshot.lights.sort_by_key(|l| l.id);
    snapshot.rgbs.sort_by_key(|l| l.id);
    snapshot.rgbws.sort_by_key(|l| l.id);
    snapshot.inputs.sort_by_key(|i| i.id);
    snapshot.thermostats.sort_by_key(|t| t.id);
    snapshot.pms.sort_by_key(|p| p.id);
    snapshot.ems.sort_by_key(|e| e.id);
    snapshot.em1s.sort_by_key(|e| e.id);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[allow(clippy::cast_possible_truncation)]
fn to_id(index: usize) -> u32 {
    index as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn gen2_status_maps_components_and_skips_services() {
        let status = as_map(json!({
            "sys": { "mac": "AABBCC", "uptime": 1200 },
            "wifi": { "sta_ip": "192.168.1.7" },
            "switch:0": { "id": 0, "output": true, "apower": 41.2, "voltage": 231.1 },
            "switch:1": { "id": 1, "output": false },
            "cover:0": { "id": 0, "state": "stopped", "current_pos": 75 },
            "input:0": { "id": 0, "state": false },
            "pm1:0": { "id": 0, "apower": 8.0 },
        }));

        let snapshot = snapshot_from_gen2(&status);
        assert_eq!(snapshot.switches.len(), 2);
        assert_eq!(snapshot.switches[0].apower, Some(41.2));
        // Omitted wire fields stay absent, never zero.
        assert_eq!(snapshot.switches[1].apower, None);
        assert_eq!(snapshot.covers[0].current_pos, Some(75));
        assert_eq!(snapshot.inputs[0].state, Some(false));
        assert_eq!(snapshot.pms[0].apower, Some(8.0));
        let total = snapshot.total_power();
        assert!((total - 49.2).abs() < 1e-9);
    }

    #[test]
    fn gen2_rgbw_carries_color_and_white() {
        let status = as_map(json!({
            "rgbw:0": {
                "id": 0, "output": true, "brightness": 80.0,
                "rgb": [255, 128, 0], "white": 25.0, "apower": 5.5
            },
        }));

        let snapshot = snapshot_from_gen2(&status);
        let rgbw = &snapshot.rgbws[0];
        assert_eq!(rgbw.rgb, Some([255, 128, 0]));
        assert_eq!(rgbw.brightness, Some(80));
        assert_eq!(rgbw.white, Some(25));
    }

    #[test]
    fn gen1_relays_take_power_from_meters() {
        let status: Gen1Status = serde_json::from_value(json!({
            "relays": [ { "ison": true }, { "ison": false } ],
            "meters": [ { "power": 35.1, "is_valid": true, "total": 1234.0 } ],
            "inputs": [ { "input": 1, "event": "", "event_cnt": 3 } ],
        }))
        .expect("valid gen1 status");

        let snapshot = snapshot_from_gen1(&status);
        assert_eq!(snapshot.switches.len(), 2);
        assert_eq!(snapshot.switches[0].apower, Some(35.1));
        assert_eq!(snapshot.switches[1].apower, None);
        assert_eq!(snapshot.inputs[0].state, Some(true));
        assert!(snapshot.pms.is_empty());
    }

    #[test]
    fn gen1_color_bulb_becomes_rgb_component() {
        let status: Gen1Status = serde_json::from_value(json!({
            "lights": [ {
                "ison": true, "mode": "color",
                "red": 200, "green": 40, "blue": 90, "gain": 100
            } ],
            "meters": [ { "power": 9.0, "is_valid": true } ],
        }))
        .expect("valid gen1 status");

        let snapshot = snapshot_from_gen1(&status);
        assert!(snapshot.lights.is_empty());
        assert_eq!(snapshot.rgbs.len(), 1);
        assert_eq!(snapshot.rgbs[0].rgb, Some([200, 40, 90]));
        assert_eq!(snapshot.rgbs[0].apower, Some(9.0));
    }

    #[test]
    fn gen1_roller_state_maps_to_motion() {
        let status: Gen1Status = serde_json::from_value(json!({
            "rollers": [ { "state": "open", "power": 110.0, "current_pos": 40 } ],
        }))
        .expect("valid gen1 status");

        let snapshot = snapshot_from_gen1(&status);
        assert_eq!(snapshot.covers[0].state, CoverState::Opening);
        assert_eq!(snapshot.covers[0].current_pos, Some(40));
    }

    #[test]
    fn gen1_emeters_become_em1_entries() {
        let status: Gen1Status = serde_json::from_value(json!({
            "relays": [ { "ison": true } ],
            "emeters": [
                { "power": 120.0, "voltage": 230.0, "is_valid": true },
                { "power": 80.0, "voltage": 229.5, "is_valid": true }
            ],
        }))
        .expect("valid gen1 status");

        let snapshot = snapshot_from_gen1(&status);
        assert_eq!(snapshot.em1s.len(), 2);
        let total = snapshot.total_power();
        assert!((total - 200.0).abs() < 1e-9);
    }

    #[test]
    fn pm_model_heuristics() {
        let pm = [
            "SHSW-PM",
            "SHPLG2-PM",
            "SNSW-001P16EU",
            "SPSW-204PE16EU",
            "SNDM-0013US",
            "SPEM-002CEBEU50",
            "SNEM-003CEBEU120",
        ];
        for model in pm {
            assert!(is_pm_model(model), "{model} should be PM-capable");
        }

        let not_pm = ["SHSW-1", "SHSW-25X", "SNSW-001X16EU", "SBBT-002C", ""];
        for model in not_pm {
            assert!(!is_pm_model(model), "{model} should not be PM-capable");
        }
    }
}

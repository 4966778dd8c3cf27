// Light, RGB, and RGBW channels share the composite-set contract:
// only fields the caller provided are forwarded, and adjusting
// brightness/color without an explicit on-state implies `on=true` so
// the new value is actually visible. An explicit on-state is honored
// verbatim.

use serde_json::{Map, Value, json};

use super::check_id;
use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{
    LightConfig, LightStatus, RgbStatus, RgbwStatus, WasOn,
};

// ── Composite-set parameter bags ────────────────────────────────────

/// Optional fields for `Light.Set`.
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    pub on: Option<bool>,
    pub brightness: Option<u8>,
    pub transition_duration: Option<f64>,
    pub toggle_after: Option<f64>,
}

/// Optional fields for `RGB.Set`.
#[derive(Debug, Clone, Default)]
pub struct RgbSet {
    pub on: Option<bool>,
    pub brightness: Option<u8>,
    pub rgb: Option<[u8; 3]>,
    pub transition_duration: Option<f64>,
}

/// Optional fields for `RGBW.Set`.
#[derive(Debug, Clone, Default)]
pub struct RgbwSet {
    pub on: Option<bool>,
    pub brightness: Option<u8>,
    pub rgb: Option<[u8; 3]>,
    pub white: Option<u8>,
    pub transition_duration: Option<f64>,
}

fn insert_opt(params: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(v) = value {
        params.insert(key.to_owned(), v.into());
    }
}

// ── Light ───────────────────────────────────────────────────────────

const LIGHT: &str = "light";

/// Operations on one `light:<id>` component.
#[derive(Clone, Copy)]
pub struct Light<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Light<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<LightStatus, Error> {
        let id = check_id(LIGHT, self.id)?;
        self.client
            .call("Light.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(LIGHT, id))
    }

    pub async fn get_config(&self) -> Result<LightConfig, Error> {
        let id = check_id(LIGHT, self.id)?;
        self.client
            .call("Light.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(LIGHT, id))
    }

    /// `Light.Set` with only the provided fields.
    pub async fn set(&self, opts: &LightSet) -> Result<(), Error> {
        let id = check_id(LIGHT, self.id)?;
        let mut params = Map::new();
        params.insert("id".into(), json!(id));

        let on = opts.on.or({
            // Implicit power-on when adjusting brightness blind.
            if opts.brightness.is_some() { Some(true) } else { None }
        });
        insert_opt(&mut params, "on", on);
        insert_opt(&mut params, "brightness", opts.brightness.map(u64::from));
        insert_opt(&mut params, "transition_duration", opts.transition_duration);
        insert_opt(&mut params, "toggle_after", opts.toggle_after);

        self.client
            .call_void("Light.Set", Some(Value::Object(params)))
            .await
            .map_err(|e| e.with_component(LIGHT, id))
    }

    pub async fn on(&self) -> Result<(), Error> {
        self.set(&LightSet {
            on: Some(true),
            ..LightSet::default()
        })
        .await
    }

    pub async fn off(&self) -> Result<(), Error> {
        self.set(&LightSet {
            on: Some(false),
            ..LightSet::default()
        })
        .await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<(), Error> {
        self.set(&LightSet {
            brightness: Some(brightness),
            ..LightSet::default()
        })
        .await
    }

    /// `Light.Toggle`. The returned snapshot reports the new state.
    pub async fn toggle(&self) -> Result<LightStatus, Error> {
        let id = check_id(LIGHT, self.id)?;
        let result: WasOn = self
            .client
            .call("Light.Toggle", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(LIGHT, id))?;
        Ok(LightStatus {
            id,
            output: !result.was_on,
            ..LightStatus::default()
        })
    }
}

// ── RGB ─────────────────────────────────────────────────────────────

const RGB: &str = "rgb";

/// Operations on one `rgb:<id>` component.
#[derive(Clone, Copy)]
pub struct Rgb<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Rgb<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<RgbStatus, Error> {
        let id = check_id(RGB, self.id)?;
        self.client
            .call("RGB.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGB, id))
    }

    pub async fn get_config(&self) -> Result<Value, Error> {
        let id = check_id(RGB, self.id)?;
        self.client
            .call("RGB.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGB, id))
    }

    /// `RGB.Set` with only the provided fields.
    pub async fn set(&self, opts: &RgbSet) -> Result<(), Error> {
        let id = check_id(RGB, self.id)?;
        let mut params = Map::new();
        params.insert("id".into(), json!(id));

        let adjusting = opts.brightness.is_some() || opts.rgb.is_some();
        let on = opts.on.or(adjusting.then_some(true));
        insert_opt(&mut params, "on", on);
        insert_opt(&mut params, "brightness", opts.brightness.map(u64::from));
        if let Some(rgb) = opts.rgb {
            params.insert("rgb".into(), json!(rgb));
        }
        insert_opt(&mut params, "transition_duration", opts.transition_duration);

        self.client
            .call_void("RGB.Set", Some(Value::Object(params)))
            .await
            .map_err(|e| e.with_component(RGB, id))
    }

    pub async fn on(&self) -> Result<(), Error> {
        self.set(&RgbSet {
            on: Some(true),
            ..RgbSet::default()
        })
        .await
    }

    pub async fn off(&self) -> Result<(), Error> {
        self.set(&RgbSet {
            on: Some(false),
            ..RgbSet::default()
        })
        .await
    }

    pub async fn set_color(&self, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.set(&RgbSet {
            rgb: Some([r, g, b]),
            ..RgbSet::default()
        })
        .await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<(), Error> {
        self.set(&RgbSet {
            brightness: Some(brightness),
            ..RgbSet::default()
        })
        .await
    }

    pub async fn set_color_and_brightness(
        &self,
        rgb: [u8; 3],
        brightness: u8,
    ) -> Result<(), Error> {
        self.set(&RgbSet {
            rgb: Some(rgb),
            brightness: Some(brightness),
            ..RgbSet::default()
        })
        .await
    }

    /// `RGB.Toggle`. The returned snapshot reports the new state.
    pub async fn toggle(&self) -> Result<RgbStatus, Error> {
        let id = check_id(RGB, self.id)?;
        let result: WasOn = self
            .client
            .call("RGB.Toggle", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGB, id))?;
        Ok(RgbStatus {
            id,
            output: !result.was_on,
            ..RgbStatus::default()
        })
    }
}

// ── RGBW ────────────────────────────────────────────────────────────

const RGBW: &str = "rgbw";

/// Operations on one `rgbw:<id>` component.
#[derive(Clone, Copy)]
pub struct Rgbw<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Rgbw<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<RgbwStatus, Error> {
        let id = check_id(RGBW, self.id)?;
        self.client
            .call("RGBW.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGBW, id))
    }

    pub async fn get_config(&self) -> Result<Value, Error> {
        let id = check_id(RGBW, self.id)?;
        self.client
            .call("RGBW.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGBW, id))
    }

    /// `RGBW.Set` with only the provided fields.
    pub async fn set(&self, opts: &RgbwSet) -> Result<(), Error> {
        let id = check_id(RGBW, self.id)?;
        let mut params = Map::new();
        params.insert("id".into(), json!(id));

        let adjusting =
            opts.brightness.is_some() || opts.rgb.is_some() || opts.white.is_some();
        let on = opts.on.or(adjusting.then_some(true));
        insert_opt(&mut params, "on", on);
        insert_opt(&mut params, "brightness", opts.brightness.map(u64::from));
        if let Some(rgb) = opts.rgb {
            params.insert("rgb".into(), json!(rgb));
        }
        insert_opt(&mut params, "white", opts.white.map(u64::from));
        insert_opt(&mut params, "transition_duration", opts.transition_duration);

        self.client
            .call_void("RGBW.Set", Some(Value::Object(params)))
            .await
            .map_err(|e| e.with_component(RGBW, id))
    }

    pub async fn on(&self) -> Result<(), Error> {
        self.set(&RgbwSet {
            on: Some(true),
            ..RgbwSet::default()
        })
        .await
    }

    pub async fn off(&self) -> Result<(), Error> {
        self.set(&RgbwSet {
            on: Some(false),
            ..RgbwSet::default()
        })
        .await
    }

    pub async fn set_color(&self, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.set(&RgbwSet {
            rgb: Some([r, g, b]),
            ..RgbwSet::default()
        })
        .await
    }

    /// White channel, 0–100.
    pub async fn set_white(&self, white: u8) -> Result<(), Error> {
        self.set(&RgbwSet {
            white: Some(white),
            ..RgbwSet::default()
        })
        .await
    }

    pub async fn set_color_and_brightness(
        &self,
        rgb: [u8; 3],
        brightness: u8,
    ) -> Result<(), Error> {
        self.set(&RgbwSet {
            rgb: Some(rgb),
            brightness: Some(brightness),
            ..RgbwSet::default()
        })
        .await
    }

    /// `RGBW.Toggle`. The returned snapshot reports the new state.
    pub async fn toggle(&self) -> Result<RgbwStatus, Error> {
        let id = check_id(RGBW, self.id)?;
        let result: WasOn = self
            .client
            .call("RGBW.Toggle", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(RGBW, id))?;
        Ok(RgbwStatus {
            id,
            output: !result.was_on,
            ..RgbwStatus::default()
        })
    }
}

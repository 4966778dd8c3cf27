use serde_json::{Value, json};

use super::check_id;
use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{SetConfigResult, ThermostatConfig, ThermostatStatus};

const KIND: &str = "thermostat";

/// Operations on one `thermostat:<id>` component.
#[derive(Clone, Copy)]
pub struct Thermostat<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Thermostat<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<ThermostatStatus, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Thermostat.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn get_config(&self) -> Result<ThermostatConfig, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Thermostat.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn set_config(&self, config: Value) -> Result<SetConfigResult, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call(
                "Thermostat.SetConfig",
                Some(json!({ "id": id, "config": config })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Set the target temperature in °C.
    pub async fn set_target(&self, target_c: f64) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void(
                "Thermostat.SetTarget",
                Some(json!({ "id": id, "target_C": target_c })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Enable or disable regulation entirely.
    pub async fn enable(&self, enable: bool) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void(
                "Thermostat.Enable",
                Some(json!({ "id": id, "enable": enable })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Switch the regulation mode (`heating`, `cooling`, ...).
    pub async fn set_mode(&self, mode: &str) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Thermostat.SetMode", Some(json!({ "id": id, "mode": mode })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Boost at full output for `seconds`.
    pub async fn boost(&self, seconds: u64) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void(
                "Thermostat.Boost",
                Some(json!({ "id": id, "duration": seconds })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn cancel_boost(&self) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Thermostat.CancelBoost", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Temporarily override the schedule with a fixed target.
    pub async fn override_target(&self, target_c: f64, seconds: u64) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void(
                "Thermostat.Override",
                Some(json!({ "id": id, "target_C": target_c, "duration": seconds })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn cancel_override(&self) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Thermostat.CancelOverride", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Run valve calibration.
    pub async fn calibrate(&self) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Thermostat.Calibrate", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }
}

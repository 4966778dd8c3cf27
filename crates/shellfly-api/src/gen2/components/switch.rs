use serde_json::json;

use super::check_id;
use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{SwitchConfig, SwitchStatus, WasOn};

const KIND: &str = "switch";

/// Operations on one `switch:<id>` component.
#[derive(Clone, Copy)]
pub struct Switch<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Switch<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    /// `Switch.GetStatus` — the normalized snapshot. Power fields stay
    /// absent when the device omits them.
    pub async fn get_status(&self) -> Result<SwitchStatus, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Switch.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Switch.GetConfig` — name, initial-state policy, auto timers.
    pub async fn get_config(&self) -> Result<SwitchConfig, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Switch.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Switch.Set` — returns the previous output state.
    pub async fn set(&self, on: bool) -> Result<bool, Error> {
        let id = check_id(KIND, self.id)?;
        let result: WasOn = self
            .client
            .call("Switch.Set", Some(json!({ "id": id, "on": on })))
            .await
            .map_err(|e| e.with_component(KIND, id))?;
        Ok(result.was_on)
    }

    pub async fn on(&self) -> Result<bool, Error> {
        self.set(true).await
    }

    pub async fn off(&self) -> Result<bool, Error> {
        self.set(false).await
    }

    /// `Switch.Toggle`. The returned snapshot reports the *new* output
    /// state — the inverse of the wire's `was_on`.
    pub async fn toggle(&self) -> Result<SwitchStatus, Error> {
        let id = check_id(KIND, self.id)?;
        let result: WasOn = self
            .client
            .call("Switch.Toggle", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))?;
        Ok(SwitchStatus {
            id,
            output: !result.was_on,
            ..SwitchStatus::default()
        })
    }

    /// Turn on, reverting after `seconds` (`toggle_after`).
    pub async fn turn_on_for(&self, seconds: f64) -> Result<bool, Error> {
        self.set_timed(true, seconds).await
    }

    /// Turn off, reverting after `seconds`.
    pub async fn turn_off_for(&self, seconds: f64) -> Result<bool, Error> {
        self.set_timed(false, seconds).await
    }

    async fn set_timed(&self, on: bool, seconds: f64) -> Result<bool, Error> {
        let id = check_id(KIND, self.id)?;
        let result: WasOn = self
            .client
            .call(
                "Switch.Set",
                Some(json!({ "id": id, "on": on, "toggle_after": seconds })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))?;
        Ok(result.was_on)
    }
}

use serde_json::{Value, json};

use super::check_id;
use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{InputConfig, InputStatus, SetConfigResult};

const KIND: &str = "input";

/// Operations on one `input:<id>` component.
#[derive(Clone, Copy)]
pub struct Input<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Input<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<InputStatus, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Input.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn get_config(&self) -> Result<InputConfig, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Input.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Input.SetConfig` with a partial config fragment.
    pub async fn set_config(&self, config: Value) -> Result<SetConfigResult, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call(
                "Input.SetConfig",
                Some(json!({ "id": id, "config": config })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Input.Trigger` — inject a synthetic event (`single_push`, ...).
    pub async fn trigger(&self, event_type: &str) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void(
                "Input.Trigger",
                Some(json!({ "id": id, "event_type": event_type })),
            )
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Input.ResetCounters`. Pass the counter names to reset; an empty
    /// slice resets all of them.
    pub async fn reset_counters(&self, types: &[&str]) -> Result<Value, Error> {
        let id = check_id(KIND, self.id)?;
        let params = if types.is_empty() {
            json!({ "id": id })
        } else {
            json!({ "id": id, "type": types })
        };
        self.client
            .call("Input.ResetCounters", Some(params))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }
}

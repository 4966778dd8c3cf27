use serde_json::json;

use super::check_id;
use crate::error::Error;
use crate::gen2::Gen2Client;
use crate::gen2::models::{CoverConfig, CoverStatus};

const KIND: &str = "cover";

/// Operations on one `cover:<id>` component.
#[derive(Clone, Copy)]
pub struct Cover<'a> {
    client: &'a Gen2Client,
    id: i64,
}

impl<'a> Cover<'a> {
    pub(crate) fn new(client: &'a Gen2Client, id: i64) -> Self {
        Self { client, id }
    }

    pub async fn get_status(&self) -> Result<CoverStatus, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Cover.GetStatus", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    pub async fn get_config(&self) -> Result<CoverConfig, Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call("Cover.GetConfig", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Cover.Open`, optionally bounded to `duration` seconds of travel.
    pub async fn open(&self, duration: Option<f64>) -> Result<(), Error> {
        self.motion("Cover.Open", duration).await
    }

    /// `Cover.Close`, optionally bounded to `duration` seconds.
    pub async fn close(&self, duration: Option<f64>) -> Result<(), Error> {
        self.motion("Cover.Close", duration).await
    }

    pub async fn stop(&self) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Cover.Stop", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// `Cover.GoToPosition`, `pos` in 0–100 (0 = closed).
    pub async fn go_to_position(&self, pos: u8) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Cover.GoToPosition", Some(json!({ "id": id, "pos": pos })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    /// Start the calibration run. Position control is unavailable until
    /// it completes.
    pub async fn calibrate(&self) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        self.client
            .call_void("Cover.Calibrate", Some(json!({ "id": id })))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }

    async fn motion(&self, method: &str, duration: Option<f64>) -> Result<(), Error> {
        let id = check_id(KIND, self.id)?;
        let params = match duration {
            Some(secs) => json!({ "id": id, "duration": secs }),
            None => json!({ "id": id }),
        };
        self.client
            .call_void(method, Some(params))
            .await
            .map_err(|e| e.with_component(KIND, id))
    }
}

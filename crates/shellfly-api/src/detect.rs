// ── Generation detection ──
//
// Two-probe dialect negotiation: the Gen2 RPC endpoint is tried first,
// the Gen1 REST identity endpoint second. Each probe runs under its own
// 5 s deadline. A probe that answers with the *wrong* generation is
// rejected, never misclassified.

use tracing::debug;

use crate::error::Error;
use crate::identity::{DeviceIdentity, Gen1DeviceInfo, Gen2DeviceInfo};
use crate::transport::{Credentials, HttpTransport, TransportConfig, PROBE_TIMEOUT};

/// Probe a device and return its normalized identity.
///
/// Credentials are attached to both probes when the username is
/// non-empty. Returns [`Error::DetectionFailed`] carrying both causes
/// when neither dialect answers acceptably.
pub async fn detect(
    address: &str,
    credentials: Option<Credentials>,
    config: &TransportConfig,
) -> Result<DeviceIdentity, Error> {
    let transport = HttpTransport::new(address, credentials, config)?;
    detect_with_transport(&transport).await
}

/// Same as [`detect`], reusing an already-built transport.
pub async fn detect_with_transport(transport: &HttpTransport) -> Result<DeviceIdentity, Error> {
    let gen2_cause = match probe_gen2(transport).await {
        Ok(identity) => {
            debug!(mac = %identity.mac, model = %identity.model, "detected gen2 device");
            return Ok(identity);
        }
        Err(e) => e,
    };

    match probe_gen1(transport).await {
        Ok(identity) => {
            debug!(mac = %identity.mac, model = %identity.model, "detected gen1 device");
            Ok(identity)
        }
        Err(gen1_cause) => Err(Error::DetectionFailed {
            gen2_cause: Box::new(gen2_cause),
            gen1_cause: Box::new(gen1_cause),
        }),
    }
}

/// `GET /rpc/Shelly.GetDeviceInfo` — accepted only when `r#gen >= 2`.
async fn probe_gen2(transport: &HttpTransport) -> Result<DeviceIdentity, Error> {
    let body = transport
        .get_with_deadline("rpc/Shelly.GetDeviceInfo", &[], PROBE_TIMEOUT)
        .await?;

    let info: Gen2DeviceInfo = serde_json::from_slice(&body)
        .map_err(|e| crate::error::decode_error(&e, &String::from_utf8_lossy(&body)))?;

    match info.r#gen {
        Some(r#gen) if r#gen >= 2 => Ok(DeviceIdentity::from(info)),
        r#gen => Err(Error::Decode {
            message: format!("rpc endpoint reports generation {:?}, expected >= 2", r#gen),
        }),
    }
}

/// `GET /shelly` — rejected when the payload claims `r#gen >= 2`.
async fn probe_gen1(transport: &HttpTransport) -> Result<DeviceIdentity, Error> {
    let body = transport
        .get_with_deadline("shelly", &[], PROBE_TIMEOUT)
        .await?;

    let info: Gen1DeviceInfo = serde_json::from_slice(&body)
        .map_err(|e| crate::error::decode_error(&e, &String::from_utf8_lossy(&body)))?;

    match info.r#gen {
        Some(r#gen) if r#gen >= 2 => Err(Error::Decode {
            message: format!("/shelly reports generation {}, refusing gen1 classification", r#gen),
        }),
        _ => Ok(DeviceIdentity::from(info)),
    }
}

// ── Per-device refresh unit ──
//
// One refresh: acquire a pool permit and the device's serialization
// lock, connect (cached or fresh, detection included), fetch status,
// convert, derive online/power, sample the history ring, swap the
// record. A failure keeps the previous snapshot and flips the record
// offline — one dead device never aborts a wave.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use shellfly_api::{DeviceIdentity, ShellyClient};

use super::{StoreEvent, StoreInner, refresh_lock, swap_record};
use crate::config::DeviceEntry;
use crate::convert::{is_pm_model, snapshot_from_gen1, snapshot_from_gen2};
use crate::error::CoreError;
use crate::model::DeviceSnapshot;

/// Refresh one device and publish `DeviceUpdated` after the swap.
pub(crate) async fn refresh_entry(inner: &Arc<StoreInner>, entry: DeviceEntry) {
    let Ok(_permit) = inner.refresh_permits.acquire().await else {
        return; // semaphore closed — store is shutting down
    };
    let lock = refresh_lock(inner, &entry.name);
    let _guard = lock.lock().await;

    let name = entry.name.clone();
    let outcome = tokio::time::timeout(inner.config.device_timeout, fetch_device(inner, &entry))
        .await
        .unwrap_or_else(|_| Err(CoreError::Api(shellfly_api::Error::Timeout)));

    let now = Utc::now();
    match outcome {
        Ok((identity, snapshot)) => {
            let power = snapshot.total_power();
            let pm_capable = snapshot.has_power_metering() || is_pm_model(&identity.model);
            if pm_capable {
                inner.history.add(&name, now, power);
            }

            debug!(device = %name, power, components = snapshot.component_count(), "refreshed");
            swap_record(inner, &name, |old| {
                let mut next = old.clone();
                next.identity = Some(identity);
                next.snapshot = snapshot;
                next.online = true;
                next.power = power;
                next.last_error = None;
                next.last_refresh = Some(now);
                next
            });
        }
        Err(e) => {
            warn!(device = %name, error = %e, "refresh failed");
            // Force a reconnect (and re-detection) on the next attempt.
            inner.clients.remove(&name);

            swap_record(inner, &name, |old| {
                let mut next = old.clone();
                next.online = false;
                next.last_error = Some(e.to_string());
                next.last_refresh = Some(now);
                next
            });
        }
    }

    let _ = inner.events.send(StoreEvent::DeviceUpdated(name));
}

/// Connect (or reuse) and pull one full status snapshot.
async fn fetch_device(
    inner: &Arc<StoreInner>,
    entry: &DeviceEntry,
) -> Result<(DeviceIdentity, DeviceSnapshot), CoreError> {
    let client = get_or_connect(inner, entry).await?;
    let identity = client.info().await?;

    let snapshot = match &*client {
        ShellyClient::Gen1(gen1) => snapshot_from_gen1(&gen1.status().await?),
        ShellyClient::Gen2(gen2) => snapshot_from_gen2(&gen2.get_status().await?),
    };

    Ok((identity, snapshot))
}

/// The cached client for a device, connecting (with generation
/// detection) when none exists yet. The transport is shared by the
/// scheduler, actuations, and ad-hoc fetches.
pub(crate) async fn get_or_connect(
    inner: &Arc<StoreInner>,
    entry: &DeviceEntry,
) -> Result<Arc<ShellyClient>, CoreError> {
    if let Some(cached) = inner.clients.get(&entry.name) {
        return Ok(Arc::clone(&cached));
    }

    let config = entry.transport_config(inner.config.device_timeout);
    let client = Arc::new(
        ShellyClient::connect(&entry.address, entry.credentials.clone(), &config).await?,
    );
    inner.clients.insert(entry.name.clone(), Arc::clone(&client));
    Ok(client)
}

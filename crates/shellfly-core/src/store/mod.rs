// ── Device telemetry store ──
//
// Shared, concurrent snapshot cache plus the engine that keeps it
// fresh. One driver task emits ticks; each tick refreshes every
// registered device in a wave through a bounded worker pool. Readers
// get atomically swapped records and never hold a lock across I/O.

mod actions;
mod refresh;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use indexmap::IndexMap;
use tokio::sync::{Semaphore, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use shellfly_api::{DeviceIdentity, ShellyClient};

use crate::command::{ActionResult, Command};
use crate::config::{DeviceEntry, StoreConfig};
use crate::error::CoreError;
use crate::history::PowerHistory;
use crate::model::DeviceSnapshot;

const EVENT_CHANNEL_SIZE: usize = 256;
const ACTION_CHANNEL_SIZE: usize = 64;

/// Store notifications, published through a broadcast channel.
///
/// `DeviceUpdated` is sent after the record's atomic swap, so a
/// subscriber reading the record right after receiving it sees the
/// update. `WaveComplete` fires once per wave, when every refresh in
/// it has landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    DeviceUpdated(String),
    WaveComplete,
}

/// Everything the store knows about one registered device.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub entry: DeviceEntry,
    /// Identity from the last successful detection, if any.
    pub identity: Option<DeviceIdentity>,
    /// Component state from the last successful refresh. A failed
    /// refresh leaves this intact.
    pub snapshot: DeviceSnapshot,
    pub online: bool,
    /// Total instantaneous power at the last successful refresh, in W.
    pub power: f64,
    pub last_error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl DeviceRecord {
    fn offline(entry: DeviceEntry) -> Self {
        Self {
            entry,
            identity: None,
            snapshot: DeviceSnapshot::default(),
            online: false,
            power: 0.0,
            last_error: None,
            last_refresh: None,
        }
    }
}

pub(crate) struct StoreInner {
    pub(crate) config: StoreConfig,
    /// Registration-ordered record map. One mutex; critical sections
    /// never span I/O.
    pub(crate) records: Mutex<IndexMap<String, Arc<DeviceRecord>>>,
    /// Connected-client cache, keyed like `records`.
    pub(crate) clients: DashMap<String, Arc<ShellyClient>>,
    /// Per-device refresh serialization: no two concurrent refreshes
    /// for the same device.
    pub(crate) refresh_locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    /// Bounded worker pool for wave refreshes.
    pub(crate) refresh_permits: Semaphore,
    pub(crate) events: broadcast::Sender<StoreEvent>,
    pub(crate) action_results: broadcast::Sender<ActionResult>,
    pub(crate) history: PowerHistory,
}

/// The shared telemetry store. Cheap to clone.
#[derive(Clone)]
pub struct DeviceStore {
    inner: Arc<StoreInner>,
}

impl DeviceStore {
    pub fn new(config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let (action_results, _) = broadcast::channel(ACTION_CHANNEL_SIZE);
        let history = PowerHistory::new(config.history_capacity);
        let refresh_permits = Semaphore::new(config.refresh_workers.max(1));

        Self {
            inner: Arc::new(StoreInner {
                config,
                records: Mutex::new(IndexMap::new()),
                clients: DashMap::new(),
                refresh_locks: DashMap::new(),
                refresh_permits,
                events,
                action_results,
                history,
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Replace the registered device list.
    ///
    /// Records for devices that keep their name and address survive, so
    /// a config reload doesn't blank the dashboard. Everything else —
    /// cached clients, refresh locks, history rings — is dropped for
    /// devices that disappeared.
    pub fn set_devices(&self, entries: Vec<DeviceEntry>) {
        let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();

        {
            let mut records = self.inner.records.lock().expect("record lock poisoned");
            let mut next = IndexMap::with_capacity(entries.len());
            for entry in entries {
                let record = match records.get(&entry.name) {
                    Some(old) if old.entry.address == entry.address => {
                        let mut kept = (**old).clone();
                        kept.entry = entry.clone();
                        kept
                    }
                    _ => DeviceRecord::offline(entry.clone()),
                };
                next.insert(entry.name, Arc::new(record));
            }
            *records = next;
        }

        self.inner.clients.retain(|name, _| names.contains(name));
        self.inner
            .refresh_locks
            .retain(|name, _| names.contains(name));
        self.inner.history.retain(&names);

        debug!(devices = names.len(), "device list replaced");
    }

    // ── Read access ──────────────────────────────────────────────────

    /// All records, in registration order. The `Arc`s are safe for
    /// read-only inspection by renderers — a concurrent refresh swaps
    /// in fresh records rather than mutating these.
    pub fn all_devices(&self) -> Vec<Arc<DeviceRecord>> {
        let records = self.inner.records.lock().expect("record lock poisoned");
        records.values().cloned().collect()
    }

    pub fn device(&self, name: &str) -> Option<Arc<DeviceRecord>> {
        let records = self.inner.records.lock().expect("record lock poisoned");
        records.get(name).cloned()
    }

    pub fn device_count(&self) -> usize {
        self.inner.records.lock().expect("record lock poisoned").len()
    }

    pub fn online_count(&self) -> usize {
        let records = self.inner.records.lock().expect("record lock poisoned");
        records.values().filter(|r| r.online).count()
    }

    /// Sum of instantaneous power across online devices, in W.
    pub fn total_power(&self) -> f64 {
        let records = self.inner.records.lock().expect("record lock poisoned");
        records
            .values()
            .filter(|r| r.online)
            .map(|r| r.power)
            .sum()
    }

    /// The per-device power-history rings.
    pub fn history(&self) -> &PowerHistory {
        &self.inner.history
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    pub fn action_results(&self) -> broadcast::Receiver<ActionResult> {
        self.inner.action_results.subscribe()
    }

    // ── Refresh engine ───────────────────────────────────────────────

    /// Drive periodic refresh waves until `cancel` fires.
    ///
    /// The first wave starts immediately. On cancellation, pending
    /// refreshes run out their deadlines and cached transports are
    /// dropped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.inner.config.poll_interval);
        info!(
            interval = ?self.inner.config.poll_interval,
            workers = self.inner.config.refresh_workers,
            "telemetry store started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        () = self.refresh_all() => {}
                    }
                }
            }
        }

        self.inner.clients.clear();
        debug!("telemetry store stopped");
    }

    /// Refresh every registered device in parallel (one wave) and
    /// publish `WaveComplete` once all results have landed.
    pub async fn refresh_all(&self) {
        let entries: Vec<DeviceEntry> = {
            let records = self.inner.records.lock().expect("record lock poisoned");
            records.values().map(|r| r.entry.clone()).collect()
        };

        let waves = entries
            .into_iter()
            .map(|entry| refresh::refresh_entry(&self.inner, entry));
        futures_util::future::join_all(waves).await;

        let _ = self.inner.events.send(StoreEvent::WaveComplete);
    }

    /// Targeted refresh for one device, through the same worker pool.
    pub async fn refresh_device(&self, name: &str) -> Result<(), CoreError> {
        let entry = self
            .device(name)
            .map(|r| r.entry.clone())
            .ok_or_else(|| CoreError::DeviceNotFound {
                name: name.to_owned(),
            })?;
        refresh::refresh_entry(&self.inner, entry).await;
        Ok(())
    }

    // ── Actuation ────────────────────────────────────────────────────

    /// Execute a command against a registered device.
    ///
    /// The outcome is broadcast as an [`ActionResult`] either way. On
    /// success an eager targeted refresh runs so the dashboard reflects
    /// the change before the next wave.
    pub async fn execute(&self, name: &str, command: Command) -> Result<(), CoreError> {
        let entry = self
            .device(name)
            .map(|r| r.entry.clone())
            .ok_or_else(|| CoreError::DeviceNotFound {
                name: name.to_owned(),
            })?;

        let result = match refresh::get_or_connect(&self.inner, &entry).await {
            Ok(client) => actions::route_command(&client, &command).await,
            Err(e) => Err(e),
        };

        let error = result.as_ref().err().map(ToString::to_string);
        let _ = self.inner.action_results.send(ActionResult {
            device: name.to_owned(),
            action: command,
            error,
        });

        if result.is_ok() {
            refresh::refresh_entry(&self.inner, entry).await;
        }
        result
    }
}

pub(crate) fn swap_record(
    inner: &StoreInner,
    name: &str,
    update: impl FnOnce(&DeviceRecord) -> DeviceRecord,
) {
    let mut records = inner.records.lock().expect("record lock poisoned");
    if let Some(slot) = records.get_mut(name) {
        let next = update(slot);
        *slot = Arc::new(next);
    }
}

/// Lazily-created per-device lock used to serialize refreshes.
pub(crate) fn refresh_lock(inner: &StoreInner, name: &str) -> Arc<tokio::sync::Mutex<()>> {
    inner
        .refresh_locks
        .entry(name.to_owned())
        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
        .clone()
}

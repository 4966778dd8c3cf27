// ── Runtime configuration ──
//
// These types describe *which* devices to watch and how hard to poll
// them. They never touch disk — the CLI/TUI shell loads its own config
// format and hands these in.

use std::time::Duration;

use shellfly_api::{Credentials, TransportConfig};

/// One registered device.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    /// Display name; also the record key in the store.
    pub name: String,
    /// `host[:port]` or full URL. Bare hosts get `http://` prepended.
    pub address: String,
    /// Basic-auth credentials. An empty username sends no header.
    pub credentials: Option<Credentials>,
    /// Skip TLS verification for this device (self-signed HTTPS).
    pub insecure: bool,
}

impl DeviceEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            credentials: None,
            insecure: false,
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// The transport settings for this device under a given deadline.
    pub(crate) fn transport_config(&self, timeout: Duration) -> TransportConfig {
        TransportConfig {
            timeout,
            insecure: self.insecure,
        }
    }
}

/// Tuning for the telemetry store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Interval between refresh waves.
    pub poll_interval: Duration,
    /// Maximum concurrent per-device refreshes within a wave.
    pub refresh_workers: usize,
    /// Per-device refresh deadline. Kept below `poll_interval` so a
    /// hung device cannot push one wave into the next.
    pub device_timeout: Duration,
    /// Samples retained per device in the power-history ring.
    pub history_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            refresh_workers: 8,
            device_timeout: Duration::from_secs(4),
            history_capacity: 60,
        }
    }
}

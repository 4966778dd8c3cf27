// ── Power-history rings ──
//
// One bounded ring of `(timestamp, watts)` samples per device, feeding
// the dashboard's sparklines. Scaling and downsampling are the
// renderer's concern; the ring only guarantees order and the bound.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// One power reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSample {
    pub ts: DateTime<Utc>,
    pub watts: f64,
}

/// Fixed-capacity recent-power sequences, keyed by device name.
///
/// Appends drop the oldest sample once a ring is full. All methods take
/// `&self`; the inner map is guarded by its own lock, separate from the
/// store's record mutex.
#[derive(Debug)]
pub struct PowerHistory {
    capacity: usize,
    rings: Mutex<HashMap<String, VecDeque<PowerSample>>>,
}

impl PowerHistory {
    /// `capacity` samples per device. At the default 5 s cadence, 60
    /// samples cover five minutes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            rings: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, evicting the oldest when the ring is full.
    pub fn add(&self, device: &str, ts: DateTime<Utc>, watts: f64) {
        let mut rings = self.rings.lock().expect("history lock poisoned");
        let ring = rings
            .entry(device.to_owned())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(PowerSample { ts, watts });
    }

    /// Copy a device's samples, oldest first. Empty for unknown devices.
    pub fn snapshot(&self, device: &str) -> Vec<PowerSample> {
        let rings = self.rings.lock().expect("history lock poisoned");
        rings
            .get(device)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop every ring.
    pub fn clear(&self) {
        self.rings.lock().expect("history lock poisoned").clear();
    }

    /// Drop rings for devices no longer registered.
    pub fn retain(&self, keep: &[String]) {
        let mut rings = self.rings.lock().expect("history lock poisoned");
        rings.retain(|name, _| keep.contains(name));
    }

    /// Number of devices with at least one sample.
    pub fn device_count(&self) -> usize {
        self.rings.lock().expect("history lock poisoned").len()
    }

    /// Total samples across all devices.
    pub fn total_samples(&self) -> usize {
        let rings = self.rings.lock().expect("history lock poisoned");
        rings.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    fn base_ts() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn ring_length_is_min_of_inserts_and_capacity() {
        for capacity in [1usize, 3, 60] {
            for inserts in [0usize, 1, 2, 59, 60, 61, 200] {
                let history = PowerHistory::new(capacity);
                for i in 0..inserts {
                    #[allow(clippy::cast_possible_wrap)]
                    let ts = base_ts() + TimeDelta::seconds(i as i64);
                    #[allow(clippy::cast_precision_loss)]
                    history.add("dev", ts, i as f64);
                }

                let samples = history.snapshot("dev");
                assert_eq!(samples.len(), inserts.min(capacity));

                // Contents are the last min(L, C) inserts, in order.
                let expected_first = inserts.saturating_sub(capacity);
                for (offset, sample) in samples.iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let expected = (expected_first + offset) as f64;
                    assert!((sample.watts - expected).abs() < f64::EPSILON);
                }
                for pair in samples.windows(2) {
                    assert!(pair[0].ts <= pair[1].ts);
                }
            }
        }
    }

    #[test]
    fn rings_are_independent_per_device() {
        let history = PowerHistory::new(4);
        history.add("a", base_ts(), 1.0);
        history.add("b", base_ts(), 2.0);
        history.add("b", base_ts() + TimeDelta::seconds(5), 3.0);

        assert_eq!(history.snapshot("a").len(), 1);
        assert_eq!(history.snapshot("b").len(), 2);
        assert_eq!(history.device_count(), 2);
        assert_eq!(history.total_samples(), 3);
        assert!(history.snapshot("missing").is_empty());
    }

    #[test]
    fn clear_and_retain() {
        let history = PowerHistory::new(4);
        history.add("a", base_ts(), 1.0);
        history.add("b", base_ts(), 2.0);

        history.retain(&["b".to_owned()]);
        assert!(history.snapshot("a").is_empty());
        assert_eq!(history.snapshot("b").len(), 1);

        history.clear();
        assert_eq!(history.total_samples(), 0);
        assert_eq!(history.device_count(), 0);
    }
}

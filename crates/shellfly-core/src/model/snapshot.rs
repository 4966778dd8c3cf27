// The per-device aggregate snapshot and its derived metrics.

use super::components::{
    CoverSnapshot, Em1Snapshot, EmSnapshot, InputSnapshot, LightSnapshot, PmSnapshot,
    SwitchSnapshot, ThermostatSnapshot,
};

/// Everything one refresh learned about a device's components.
///
/// Published atomically by the store — readers see either the whole
/// previous snapshot or the whole new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub switches: Vec<SwitchSnapshot>,
    pub covers: Vec<CoverSnapshot>,
    pub lights: Vec<LightSnapshot>,
    pub rgbs: Vec<LightSnapshot>,
    pub rgbws: Vec<LightSnapshot>,
    pub inputs: Vec<InputSnapshot>,
    pub thermostats: Vec<ThermostatSnapshot>,
    pub pms: Vec<PmSnapshot>,
    pub ems: Vec<EmSnapshot>,
    pub em1s: Vec<Em1Snapshot>,
}

impl DeviceSnapshot {
    /// Total instantaneous power across all PM-capable components, in W.
    pub fn total_power(&self) -> f64 {
        let actuators = self
            .switches
            .iter()
            .filter_map(|s| s.apower)
            .chain(self.covers.iter().filter_map(|c| c.apower))
            .chain(self.lights.iter().filter_map(|l| l.apower))
            .chain(self.rgbs.iter().filter_map(|l| l.apower))
            .chain(self.rgbws.iter().filter_map(|l| l.apower));

        let meters = self
            .pms
            .iter()
            .filter_map(|p| p.apower)
            .chain(self.ems.iter().filter_map(|e| e.total_act_power))
            .chain(self.em1s.iter().filter_map(|e| e.act_power));

        actuators.chain(meters).sum()
    }

    /// Whether any component in this snapshot reports power.
    pub fn has_power_metering(&self) -> bool {
        if !self.pms.is_empty() || !self.ems.is_empty() || !self.em1s.is_empty() {
            return true;
        }
        self.switches.iter().any(|s| s.apower.is_some())
            || self.covers.iter().any(|c| c.apower.is_some())
            || self.lights.iter().any(|l| l.apower.is_some())
            || self.rgbs.iter().any(|l| l.apower.is_some())
            || self.rgbws.iter().any(|l| l.apower.is_some())
    }

    /// Total number of typed components.
    pub fn component_count(&self) -> usize {
        self.switches.len()
            + self.covers.len()
            + self.lights.len()
            + self.rgbs.len()
            + self.rgbws.len()
            + self.inputs.len()
            + self.thermostats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn total_power_sums_actuators_and_meters() {
        let snapshot = DeviceSnapshot {
            switches: vec![
                SwitchSnapshot {
                    id: 0,
                    output: true,
                    apower: Some(12.5),
                    ..SwitchSnapshot::default()
                },
                SwitchSnapshot {
                    id: 1,
                    output: false,
                    apower: None,
                    ..SwitchSnapshot::default()
                },
            ],
            pms: vec![PmSnapshot {
                id: 0,
                apower: Some(7.5),
                ..PmSnapshot::default()
            }],
            ems: vec![EmSnapshot {
                id: 0,
                total_act_power: Some(230.0),
                ..EmSnapshot::default()
            }],
            ..DeviceSnapshot::default()
        };

        let total = snapshot.total_power();
        assert!((total - 250.0).abs() < f64::EPSILON);
        assert!(snapshot.has_power_metering());
    }

    #[test]
    fn absent_power_fields_mean_no_metering() {
        let snapshot = DeviceSnapshot {
            switches: vec![SwitchSnapshot::default()],
            inputs: vec![InputSnapshot::default()],
            ..DeviceSnapshot::default()
        };
        assert!(!snapshot.has_power_metering());
        assert_eq!(snapshot.total_power(), 0.0);
    }
}

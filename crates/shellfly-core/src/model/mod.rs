// ── Normalized domain model ──
//
// Dialect-neutral component snapshots. Both wire dialects convert into
// these shapes (see `convert`); the dashboard renders them without
// knowing which generation produced them.

mod components;
mod snapshot;

pub use components::{
    CoverSnapshot, Em1Snapshot, EmSnapshot, InputSnapshot, LightSnapshot, PmSnapshot,
    SwitchSnapshot, ThermostatSnapshot,
};
pub use snapshot::DeviceSnapshot;

// Re-exported so consumers don't need a direct shellfly-api dependency
// for the shared wire enums.
pub use shellfly_api::gen2_models::{CoverState, EnergyCounters};

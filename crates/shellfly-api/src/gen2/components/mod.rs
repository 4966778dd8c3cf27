// Per-component operation objects for the Gen2 dialect.
//
// Each accessor is a thin dispatcher: it holds a client reference and a
// raw index, validates the index on first use, and maps normalized
// operations onto RPC methods. Errors come back wrapped with the
// component identity (`"switch:0: ..."`).

mod cover;
mod input;
mod kvs;
mod light;
mod switch;
mod thermostat;

pub use cover::Cover;
pub use input::Input;
pub use kvs::Kvs;
pub use light::{Light, LightSet, Rgb, RgbSet, Rgbw, RgbwSet};
pub use switch::Switch;
pub use thermostat::Thermostat;

use crate::error::Error;

/// Validate a raw component index. Accessors accept any integer;
/// negatives and indices beyond the wire's id range fail here, on the
/// first operation, before anything is sent.
pub(crate) fn check_id(kind: &str, id: i64) -> Result<u32, Error> {
    u32::try_from(id).map_err(|_| Error::InvalidComponentId { id }.with_component(kind, id))
}

// ── Core error types ──
//
// Errors surfaced to the dashboard and command layer. Wire-level
// failures stay inside `shellfly_api::Error`; this type adds the
// store-level failure modes on top.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No registered device with this name.
    #[error("device not found: {name}")]
    DeviceNotFound { name: String },

    /// The operation has no counterpart on this device's dialect
    /// (e.g. an RGBW write against a Gen1 relay).
    #[error("operation not supported on {generation} devices: {operation}")]
    Unsupported {
        operation: String,
        generation: String,
    },

    /// A command addressed a component the device does not expose.
    #[error("no {component} on device {device}")]
    ComponentMissing { device: String, component: String },

    /// Wire-level failure, classified by the shared taxonomy.
    #[error(transparent)]
    Api(#[from] shellfly_api::Error),
}

impl CoreError {
    /// Whether a retry on the next wave could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}

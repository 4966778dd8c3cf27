// shellfly-api: Async Rust client for Shelly devices (Gen1 REST + Gen2 JSON-RPC)

pub mod component;
pub mod detect;
pub mod device;
pub mod error;
pub mod gen1;
pub mod gen2;
pub mod identity;
pub mod transport;

pub use component::{ComponentEntry, ComponentKey, ComponentKind};
pub use detect::detect;
pub use device::ShellyClient;
pub use error::Error;
pub use gen1::Gen1Client;
pub use gen2::Gen2Client;
pub use gen2::models as gen2_models;
pub use gen1::models as gen1_models;
pub use identity::{DeviceIdentity, Generation};
pub use transport::{Credentials, HttpTransport, TransportConfig};

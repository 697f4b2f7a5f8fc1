// hassdex-api: async client for the Home Assistant REST and template API

pub mod client;
pub mod error;
pub mod models;
pub mod templates;
pub mod transport;

pub use client::HubClient;
pub use error::Error;
pub use models::{AreaRef, DeviceInfo, DeviceInfoLookup, HubConfig, StateObject};
pub use transport::{TlsMode, TransportConfig};

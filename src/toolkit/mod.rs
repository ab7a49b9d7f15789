//! Configuration and a JSON request dispatcher over the protocol engines.

/// Layered configuration (defaults, TOML file, environment).
pub mod config;
/// Request and response messages.
pub mod messages;
/// The request dispatcher.
pub mod service;

pub use config::{RandomnessMode, RandomnessSettings, ToolkitConfig};
pub use messages::{Algorithm, Reply, Request, Response};
pub use service::Toolkit;

//! Outbound payload bridging for old-generation fancy cars.
//!
//! Old-generation cars and the current backend speak different payload
//! formats over the same MQTT topics. This crate plugs into a hosting
//! broker as an outbound publish interceptor: it classifies the topic of
//! every outbound publish, looks up the destination client's generation in
//! a persistent registry, and rewrites the payload when the client is an
//! old-generation car.
//!
//! - `fancy-cars/<client>/temperature` readings are converted from the
//!   old free-text form (`15.0°C`) into structured telemetry JSON.
//! - `fancy-cars/<client>/command` messages are converted from structured
//!   backend JSON into the flat `<command> <subject>` text old cars expect.
//!
//! When the registry cannot answer, or the payload is malformed, delivery
//! is suppressed silently rather than risking a wrong-format payload.

pub mod config;
pub mod intercept;
pub mod lookup;
pub mod publish;
pub mod topic;
pub mod transform;

pub use config::InterceptorConfig;
pub use intercept::OutboundInterceptor;
pub use lookup::{GenerationLookup, GenerationSource, GenerationStatus};
pub use publish::OutboundPublish;
pub use topic::{classify, TopicClass};
pub use transform::{BackendTransformer, DegreeUnit, DeviceTransformer, PayloadTransformer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Persistent storage for the fancy-cars bridge.
//!
//! The bridge keeps a single piece of durable state: the generation
//! registry, a redb table mapping client identifiers to a generation flag.
//! Everything else in the bridge is stateless.

pub mod error;
pub mod generation;

pub use error::{Error, Result};
pub use generation::{GenerationStore, OLD_GENERATION};

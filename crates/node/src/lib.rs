//! EpicChain node composition root.
//!
//! Wires the configured store provider into a [`StorageSystem`] and sets up
//! the tracing subscriber used by the `epicchain-node` binary.

pub mod logging;
pub mod system;

pub use logging::init_tracing;
pub use system::StorageSystem;

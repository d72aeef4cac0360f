//! # Application Layer
//!
//! The driver task, its handle and the lazily started shared bridge.

pub mod handle;
pub mod service;
pub mod shared;

pub use handle::BridgeHandle;
pub use service::CallResultBridge;
pub use shared::SharedBridge;

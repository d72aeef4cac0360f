//! # Ports Layer
//!
//! Inbound (API) and outbound (native library) traits.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

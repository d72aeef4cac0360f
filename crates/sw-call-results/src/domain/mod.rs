//! # Domain Layer
//!
//! Core types for the call-result bridge.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod stats;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use stats::*;
pub use value_objects::*;

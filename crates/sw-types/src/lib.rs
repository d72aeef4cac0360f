//! # Steamworks Shared Types
//!
//! Identifiers, opaque handles and enums shared by the call-result bridge and
//! the native binding.
//!
//! ## Design Principles
//!
//! - **Newtype Handles**: every opaque 64-bit value the native library hands
//!   out gets its own type, so a leaderboard handle can never be passed where
//!   a call handle is expected.
//! - **Explicit Enum Values**: every enum is `#[repr(i32)]` with the value the
//!   flat API uses, and converts back from `i32` through `TryFrom`.

pub mod enums;
pub mod errors;
pub mod ids;

pub use enums::*;
pub use errors::*;
pub use ids::*;

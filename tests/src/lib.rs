//! # Steamworks Bridge Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── bridge_flows.rs       # typed records through a running bridge
//! │   ├── leaderboard_flows.rs  # sw-native leaderboards over a mock library
//! │   └── telemetry_flows.rs    # metrics and logging around a live bridge
//! └── benches/
//!     └── bridge_benchmarks.rs  # decoder and tick throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sw-tests
//! cargo test -p sw-tests integration::leaderboard_flows
//! cargo bench -p sw-tests
//! ```

pub mod integration;

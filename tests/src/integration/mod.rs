//! Cross-crate integration flows.

pub mod bridge_flows;
pub mod leaderboard_flows;
pub mod telemetry_flows;

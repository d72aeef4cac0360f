//! # Algorithms
//!
//! Pure pieces of the bridge: layout tables, decoding, the deferred queue and
//! the per-request polling decision.

pub mod containment;
pub mod decoder;
pub mod deferred;
pub mod layout;
pub mod polling;

pub use containment::run_contained;
pub use decoder::ResultDecoder;
pub use deferred::{DeferredQueue, DeferredTick};
pub use layout::{
    native_layout, EntryLayout, FindResultLayout, LayoutTable, PointerWidth, ScoreUploadedLayout,
    ScoresDownloadedLayout, TargetOs, TargetPlatform, PACK_LARGE, PACK_SMALL,
};
pub use polling::{evaluate, PollDecision};

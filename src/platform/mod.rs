//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (engine clock source)
//! - Card hit testing for the drag-and-drop UI
//! - Browser bindings (wasm32 only)

pub mod clock;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::now_ms;
pub use layout::{CardRect, PlacedCard, find_merge_candidate, midline_x, overlap_ratio, resolve_side};

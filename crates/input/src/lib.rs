//! Input: raw pointer events normalized into scene-level actions.
//!
//! # Invariants
//! - Scenes consume [`Action`]s, never window-system events.
//! - All mapping functions are pure and total.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerState, normalize, pointer_to_ndc};

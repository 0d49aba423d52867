//! Developer tooling: read-only scene inspection.
//!
//! # Invariants
//! - Inspection never mutates a scene.

mod inspector;

pub use inspector::{CityscapeSummary, ColumnInfo, FlightSummary, SceneInspector};

//! Layout module orchestrator.
//!
//! The engine is a pure function of the focus partition and viewport
//! height; callers thread the returned [`LayoutPlan`] into rendering.

pub mod grid;

pub use grid::{LayoutConfig, LayoutPlan, TierLayout, compute_layout, compute_layout_with};

//! Transient call-screen UI state: which overlay is up and whether the
//! controls bar is showing.

pub mod controls;
pub mod overlay;

pub use controls::{AutoHideTimer, DEFAULT_AUTO_HIDE, SessionUi};
pub use overlay::{Overlay, OverlayState, OverlayTransition};

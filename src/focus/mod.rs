//! Pin and screen-share precedence.

mod core;

pub use self::core::{
    FocusReason, FocusResolution, FocusState, Partition, PinOutcome, resolve_focus,
};

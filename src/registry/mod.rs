//! Canonical participant ordering for a call.
//!
//! `build_registry` is the stateless merge; `ParticipantRegistry` wraps it
//! with order caching so repeated passes over the same ids never reshuffle
//! tiles.

mod core;

pub use self::core::{
    LocalIdentity, ParticipantRegistry, ParticipantSnapshot, RegistryDiff, build_registry,
    raised_hands_first,
};

//! Render list assembly for the call grid.

mod core;

pub use self::core::{RenderTile, TileBadges, fingerprint, render_list};

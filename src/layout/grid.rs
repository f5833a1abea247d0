//! Call grid layout: column counts and tile heights derived from the focus
//! partition and the viewport height.
//!
//! Heights are expressed in the caller's layout units; the engine never
//! looks at pixels. Rules, in priority order:
//! - a focused participant with company gets a one-column tile at
//!   `focus_ratio` of the viewport, and everyone else shares a strip split
//!   over at most three columns;
//! - four or more participants without focus get a two-column grid;
//! - up to three participants without focus stack in one column.
//!
//! # Example
//! ```
//! use call_room::focus::Partition;
//! use call_room::layout::compute_layout;
//!
//! let plan = compute_layout(&Partition::flat(&[]), 800.0);
//! assert_eq!(plan.columns(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::focus::Partition;
use crate::participant::ParticipantId;

const MAX_STRIP_COLUMNS: usize = 3;
const GRID_COLUMNS: usize = 2;
const GRID_THRESHOLD: usize = 4;

/// Viewport fractions used by the layout rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of the focused tile.
    pub focus_ratio: f32,
    /// Strip shared by the others while the local user presents.
    pub local_share_strip_ratio: f32,
    /// Strip shared by the others in every other focused layout.
    pub strip_ratio: f32,
    /// Lower bound for tiles in the two-column grid.
    pub grid_min_ratio: f32,
    /// Share of each grid row actually filled by a tile.
    pub grid_fill_ratio: f32,
    /// Tile heights for one, two and three unfocused participants.
    pub stacked_ratios: [f32; 3],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            focus_ratio: 0.7,
            local_share_strip_ratio: 0.2,
            strip_ratio: 0.3,
            grid_min_ratio: 0.25,
            grid_fill_ratio: 0.85,
            stacked_ratios: [0.8, 0.4, 0.3],
        }
    }
}

impl LayoutConfig {
    /// Every ratio must lie in `(0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("focus_ratio", self.focus_ratio),
            ("local_share_strip_ratio", self.local_share_strip_ratio),
            ("strip_ratio", self.strip_ratio),
            ("grid_min_ratio", self.grid_min_ratio),
            ("grid_fill_ratio", self.grid_fill_ratio),
            ("stacked_ratios[0]", self.stacked_ratios[0]),
            ("stacked_ratios[1]", self.stacked_ratios[1]),
            ("stacked_ratios[2]", self.stacked_ratios[2]),
        ];
        for (name, value) in named {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{name} must be within (0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

/// Column count and uniform tile height for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierLayout {
    pub columns: usize,
    pub tile_height: f32,
    pub tiles: usize,
}

impl TierLayout {
    pub fn rows(&self) -> usize {
        self.tiles.div_ceil(self.columns.max(1))
    }
}

/// One frame's worth of layout. Recomputed every reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    /// The large tile, present only when something is focused and there is
    /// at least one other participant.
    pub focus: Option<TierLayout>,
    /// Everyone not in the focus tier.
    pub grid: TierLayout,
    /// Render order; the focused participant comes first.
    pub order: Vec<ParticipantId>,
}

impl LayoutPlan {
    /// Column count of the main grid tier.
    pub fn columns(&self) -> usize {
        self.grid.columns
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus.and(self.order.first().map(String::as_str))
    }

    /// Height assigned to the tile of `id`, if it is part of the plan.
    pub fn tile_height_for(&self, id: &str) -> Option<f32> {
        let pos = self.order.iter().position(|o| o == id)?;
        match self.focus {
            Some(focus) if pos == 0 => Some(focus.tile_height),
            _ => Some(self.grid.tile_height),
        }
    }
}

/// [`compute_layout_with`] using the default ratios.
pub fn compute_layout(partition: &Partition<'_>, viewport_height: f32) -> LayoutPlan {
    compute_layout_with(partition, viewport_height, &LayoutConfig::default())
}

/// Pure layout function over a focus partition.
pub fn compute_layout_with(
    partition: &Partition<'_>,
    viewport_height: f32,
    config: &LayoutConfig,
) -> LayoutPlan {
    let vh = viewport_height.max(0.0);
    let total = partition.total();

    let order: Vec<ParticipantId> = partition
        .focused
        .into_iter()
        .chain(partition.rest.iter().copied())
        .map(|p| p.id.clone())
        .collect();

    if partition.focused.is_some() && total > 1 {
        let others = partition.rest.len();
        let columns = others.min(MAX_STRIP_COLUMNS);
        let rows = others.div_ceil(columns);
        let strip_ratio = if partition.is_local_share() {
            config.local_share_strip_ratio
        } else {
            config.strip_ratio
        };

        return LayoutPlan {
            focus: Some(TierLayout {
                columns: 1,
                tile_height: config.focus_ratio * vh,
                tiles: 1,
            }),
            grid: TierLayout {
                columns,
                tile_height: strip_ratio * vh / rows as f32,
                tiles: others,
            },
            order,
        };
    }

    let grid = if total >= GRID_THRESHOLD {
        let rows = total.div_ceil(GRID_COLUMNS);
        let fitted = (vh / rows as f32) * config.grid_fill_ratio;
        TierLayout {
            columns: GRID_COLUMNS,
            tile_height: fitted.max(config.grid_min_ratio * vh),
            tiles: total,
        }
    } else {
        let ratio = match total {
            0 | 1 => config.stacked_ratios[0],
            2 => config.stacked_ratios[1],
            _ => config.stacked_ratios[2],
        };
        TierLayout {
            columns: 1,
            tile_height: ratio * vh,
            tiles: total,
        }
    };

    LayoutPlan {
        focus: None,
        grid,
        order,
    }
}

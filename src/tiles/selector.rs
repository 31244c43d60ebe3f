//! Discrete tile selection from a continuous transform.
//!
//! The pyramid has whole-world images at zoom levels `0..=log2(W / S)`, level
//! `z` being `2^z` tiles of `S` pixels per axis. For a given transform the
//! selector picks the shallowest level whose native resolution is at least
//! the on-screen footprint, then the rows and columns of that level which
//! intersect the screen. The returned tile transform places tile `(row, col)`
//! at `(col * S, row * S)` in its own group and scales the group so the
//! discrete level lines up with the continuous scale.

use crate::{
    constants::{TILE_SIZE, WHEEL_DELTA, WORLD_MAX},
    core::{bounds::Bounds, geo::{round_half_up, Point}, transform::Transform, viewport::Viewport},
    tiles::Tile,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Tiles to draw for one frame plus the transform of the tile group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSelection {
    pub zoom: u8,
    pub tiles: Vec<Tile>,
    /// `translate(x, y) scale(k')` applied to the tile group
    pub transform: Transform,
    tile_size: f64,
}

impl TileSelection {
    pub(crate) fn empty(transform: Transform, tile_size: f64) -> Self {
        Self {
            zoom: 0,
            tiles: Vec::new(),
            transform: Transform::compose(transform.x, transform.y, 1.0),
            tile_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(|tile| tile.id.as_str())
    }

    /// On-screen edge length of one tile
    pub fn tile_size_scaled(&self) -> f64 {
        self.tile_size * self.transform.k
    }

    /// Screen-space rectangle covered by `tile`
    pub fn screen_rect(&self, tile: &Tile) -> Bounds {
        let local = Point::new(tile.col as f64 * self.tile_size, tile.row as f64 * self.tile_size);
        let size = self.tile_size;
        Bounds::new(
            self.transform.apply(local),
            self.transform
                .apply(Point::new(local.x + size, local.y + size)),
        )
    }
}

/// Pure tile selection over a square world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSelector {
    tile_size: f64,
    world_max: f64,
}

impl Default for TileSelector {
    fn default() -> Self {
        Self::new(TILE_SIZE as f64, WORLD_MAX)
    }
}

impl TileSelector {
    pub fn new(tile_size: f64, world_max: f64) -> Self {
        Self {
            tile_size,
            world_max,
        }
    }

    /// Deepest zoom level; at this level the world is covered by whole tiles
    /// drawn at scale 1.
    pub fn max_tile_zoom(&self) -> f64 {
        (self.world_max.log2() - self.tile_size.log2()).max(0.0)
    }

    /// Tiles covering `viewport` under `transform`.
    ///
    /// The scale is rounded first, so transforms whose scales agree to three
    /// decimals select identical tiles.
    pub fn select(&self, transform: &Transform, viewport: &Viewport) -> TileSelection {
        let transform = transform.with_rounded_scale();
        let k = transform.k;

        if viewport.is_degenerate() || !transform.is_finite() || k <= 0.0 {
            return TileSelection::empty(transform, self.tile_size);
        }

        let log2_tile_size = self.tile_size.log2();
        let max_tile_zoom = self.max_tile_zoom();
        let max_coord_scaled = self.world_max * k;

        let effective_width = effective_extent(max_coord_scaled, viewport.width, transform.x);
        let effective_height = effective_extent(max_coord_scaled, viewport.height, transform.y);

        let scale_log = k.log2();
        let tile_zoom = (effective_width.max(effective_height).log2().ceil() - log2_tile_size)
            .min(max_tile_zoom)
            .max(0.0);

        // Tile-local scale reconciling the discrete level with the continuous
        // scale, snapped to tenths of a level.
        let p = round_half_up((tile_zoom - scale_log - max_tile_zoom) * 10.0) / 10.0;
        let tile_k = WHEEL_DELTA.powf(p);
        let tile_size_scaled = self.tile_size * tile_k;

        let tiles_per_axis = 2_f64.powf(tile_zoom);
        let cols = axis_range(
            transform.x,
            viewport.width,
            max_coord_scaled,
            tile_size_scaled,
            tiles_per_axis,
        );
        let rows = axis_range(
            transform.y,
            viewport.height,
            max_coord_scaled,
            tile_size_scaled,
            tiles_per_axis,
        );

        let zoom = tile_zoom as u8;
        let tiles = rows
            .flat_map(|row| cols.clone().map(move |col| Tile::new(zoom, row, col)))
            .collect();

        TileSelection {
            zoom,
            tiles,
            transform: Transform::compose(transform.x, transform.y, tile_k),
            tile_size: self.tile_size,
        }
    }
}

/// Pixel footprint used to pick the zoom level on one axis.
///
/// A world that fits on screen is measured as the world; a larger world is
/// measured by the screen minus twice the translation on that axis.
fn effective_extent(max_coord_scaled: f64, screen: f64, translate: f64) -> f64 {
    let extent = if max_coord_scaled <= screen {
        max_coord_scaled
    } else {
        screen - 2.0 * translate
    };
    extent.floor().max(1.0)
}

/// Tile indices intersecting `[0, screen)` on one axis, clamped to the pyramid.
fn axis_range(
    translate: f64,
    screen: f64,
    max_coord_scaled: f64,
    tile_size_scaled: f64,
    tiles_per_axis: f64,
) -> Range<u32> {
    // empty screen strip past the world's far edge
    let crop = if max_coord_scaled > screen {
        (screen - (translate + max_coord_scaled)).max(0.0)
    } else {
        0.0
    };

    let start = ((0.0 - translate) / tile_size_scaled).floor().max(0.0);
    let end = ((screen - translate - crop) / tile_size_scaled)
        .ceil()
        .min(tiles_per_axis)
        .max(0.0);

    if start >= end {
        return 0..0;
    }
    start as u32..end as u32
}

//! Overlay layers drawn on top of the tiles
//!
//! Every layer filters its own entities against the bounds of the current
//! frame and publishes a backend-neutral [`base::LayerFrame`].

pub mod macros;

pub mod base;
pub mod compass;
pub mod entity;
pub mod grid;
pub mod journey;
pub mod labels;
pub mod manager;
pub mod pb_zone;
pub mod ports;

pub use base::{LayerFrame, LayerKind, OverlayItem, OverlayLayer};
pub use manager::LayerManager;

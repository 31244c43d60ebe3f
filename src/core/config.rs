//! Configuration for the map engine and its adapters
//!
//! Engine constants (world size, tile size, scale limits, level-of-detail
//! thresholds) live in [`crate::constants`]. This module holds the settings
//! an embedding application chooses: which interactions are enabled, the
//! chrome drawn over the map edges, where tiles and datasets come from.
//! Every section has defaults, so a partial JSON document is a valid config.

use crate::{
    constants::{MAX_SCALE, TILE_IMAGE_EXTENSION, TILE_ROOT},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub interaction: InteractionConfig,
    pub chrome: ChromeConfig,
    pub tiles: TileConfig,
    pub datasets: DatasetConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub double_click_zoom: bool,
    pub pinch_zoom: bool,
    /// Scale a double-click zooms to
    pub double_click_scale: f64,
    /// Scale used by "go to port" and "go to coordinate"
    pub goto_scale: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            double_click_zoom: true,
            pinch_zoom: true,
            double_click_scale: 2.0,
            goto_scale: 2.0,
        }
    }
}

/// Screen chrome covering the map edges, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Width of the y-axis grid background along the left edge
    pub y_grid_background_width: f64,
    /// Height of the x-axis grid background along the top edge
    pub x_grid_background_height: f64,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            y_grid_background_width: 40.0,
            x_grid_background_height: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Directory or URL prefix of the tile pyramid
    pub root: String,
    /// Image file extension without the dot
    pub extension: String,
    /// Number of decoded tile images kept after they leave the screen
    pub cache_size: usize,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            root: TILE_ROOT.to_string(),
            extension: TILE_IMAGE_EXTENSION.to_string(),
            cache_size: 512,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory or URL prefix the dataset names are resolved against
    pub base: String,
    pub ports: String,
    pub pb_zones: String,
    pub regions: String,
    pub counties: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base: "data".to_string(),
            ports: "ports.json".to_string(),
            pb_zones: "pb-zones.json".to_string(),
            regions: "regions.json".to_string(),
            counties: "counties.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Minimum on-screen distance between two grid lines
    pub min_line_spacing_px: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_line_spacing_px: 100.0,
        }
    }
}

impl MapConfig {
    /// Parses and validates a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MapError::Config(format!("{name} must be positive, got {value}")))
            }
        };
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(MapError::Config(format!("{name} must not be negative, got {value}")))
            }
        };

        positive("interaction.double_click_scale", self.interaction.double_click_scale)?;
        positive("interaction.goto_scale", self.interaction.goto_scale)?;
        if self.interaction.goto_scale > MAX_SCALE || self.interaction.double_click_scale > MAX_SCALE {
            log::warn!("zoom target scales above {MAX_SCALE} will be clamped");
        }
        non_negative("chrome.y_grid_background_width", self.chrome.y_grid_background_width)?;
        non_negative("chrome.x_grid_background_height", self.chrome.x_grid_background_height)?;
        positive("grid.min_line_spacing_px", self.grid.min_line_spacing_px)?;

        if self.tiles.extension.is_empty() {
            return Err(MapError::Config("tiles.extension must not be empty".to_string()));
        }
        if self.tiles.cache_size == 0 {
            return Err(MapError::Config("tiles.cache_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

use crate::constants::{LABEL_ZOOM_THRESHOLD, PB_ZONE_ZOOM_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete level of detail derived from the continuous scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomLevel {
    Initial,
    PortLabel,
    PbZone,
}

impl ZoomLevel {
    /// Thresholds are checked high to low and are exclusive.
    pub fn from_scale(k: f64) -> Self {
        if k > PB_ZONE_ZOOM_THRESHOLD {
            ZoomLevel::PbZone
        } else if k > LABEL_ZOOM_THRESHOLD {
            ZoomLevel::PortLabel
        } else {
            ZoomLevel::Initial
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomLevel::Initial => write!(f, "initial"),
            ZoomLevel::PortLabel => write!(f, "portLabel"),
            ZoomLevel::PbZone => write!(f, "pbZone"),
        }
    }
}

/// Remembers the last level so layers only hear about real transitions
#[derive(Debug, Clone, Default)]
pub struct LevelOfDetailPolicy {
    current: Option<ZoomLevel>,
}

impl LevelOfDetailPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level currently in effect, `Initial` before the first update
    pub fn current(&self) -> ZoomLevel {
        self.current.unwrap_or(ZoomLevel::Initial)
    }

    /// Returns the new level if `k` moved across a threshold.
    ///
    /// The first call always reports its level.
    pub fn update(&mut self, k: f64) -> Option<ZoomLevel> {
        let level = ZoomLevel::from_scale(k);
        if self.current == Some(level) {
            return None;
        }
        log::debug!("zoom level {} -> {}", self.current(), level);
        self.current = Some(level);
        Some(level)
    }
}

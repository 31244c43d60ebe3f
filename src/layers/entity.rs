//! Overlay entities as supplied by the data collaborator.
//!
//! Only the representative point (and, for labels, name and angle) is read;
//! every other field in the source JSON is ignored.

use crate::{core::geo::Point, traits::Positioned};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity ids arrive as strings or numbers depending on the dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}

/// `{id, coordinates: [x, y]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntity {
    pub id: EntityId,
    pub coordinates: Point,
    /// Display name, when the dataset carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PointEntity {
    pub fn new(id: impl Into<EntityId>, coordinates: Point) -> Self {
        Self {
            id: id.into(),
            coordinates,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name if present, id otherwise
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

impl Positioned for PointEntity {
    fn position(&self) -> Point {
        self.coordinates
    }
}

/// `{name, centroid: [x, y], angle}` for region and county polygons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonLabel {
    pub name: String,
    pub centroid: Point,
    /// Text rotation in degrees
    #[serde(default)]
    pub angle: f64,
}

impl PolygonLabel {
    pub fn new(name: impl Into<String>, centroid: Point, angle: f64) -> Self {
        Self {
            name: name.into(),
            centroid,
            angle,
        }
    }
}

impl Positioned for PolygonLabel {
    fn position(&self) -> Point {
        self.centroid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let entities: Vec<PointEntity> = serde_json::from_str(
            r#"[
                {"id": 231, "coordinates": [4396, 2494], "nation": 3},
                {"id": "fort-1", "coordinates": [10.5, 20.0], "name": "Fort"}
            ]"#,
        )
        .unwrap();

        assert_eq!(entities[0].id, EntityId::Number(231));
        assert_eq!(entities[0].label(), "231");
        assert_eq!(entities[1].id, EntityId::from("fort-1"));
        assert_eq!(entities[1].label(), "Fort");
        assert_eq!(entities[1].position(), Point::new(10.5, 20.0));
    }

    #[test]
    fn test_polygon_label_angle_defaults_to_zero() {
        let labels: Vec<PolygonLabel> =
            serde_json::from_str(r#"[{"name": "Gulf", "centroid": [3000, 4000]}]"#).unwrap();
        assert_eq!(labels[0].angle, 0.0);
        assert_eq!(labels[0].position(), Point::new(3000.0, 4000.0));
    }
}

//! Keyed data join between successive tile selections.
//!
//! Tiles are keyed by id. A tile that stays visible keeps the very same
//! `Arc<Tile>` across frames, so a rendering backend can key its image
//! elements on it without re-creating them.

use crate::{
    prelude::{Arc, HashMap},
    tiles::{selector::TileSelection, Tile},
};

/// Result of joining a selection against the tiles already on screen
#[derive(Debug, Clone, Default)]
pub struct TileDiff {
    /// Ids seen for the first time, in selection order
    pub enter: Vec<Arc<Tile>>,
    /// Ids that stay, carrying the instance created when they entered
    pub update: Vec<Arc<Tile>>,
    /// Ids no longer selected
    pub exit: Vec<Arc<Tile>>,
}

impl TileDiff {
    pub fn is_unchanged(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TileJoin {
    current: HashMap<String, Arc<Tile>>,
    order: Vec<String>,
}

impl TileJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, selection: &TileSelection) -> TileDiff {
        let mut diff = TileDiff::default();
        let mut next: HashMap<String, Arc<Tile>> = HashMap::default();
        let mut order = Vec::with_capacity(selection.tiles.len());

        for tile in &selection.tiles {
            if next.contains_key(&tile.id) {
                continue;
            }
            let entry = match self.current.remove(&tile.id) {
                Some(existing) => {
                    diff.update.push(Arc::clone(&existing));
                    existing
                }
                None => {
                    let created = Arc::new(tile.clone());
                    diff.enter.push(Arc::clone(&created));
                    created
                }
            };
            order.push(tile.id.clone());
            next.insert(tile.id.clone(), entry);
        }

        // whatever was not claimed above has left the screen
        for id in &self.order {
            if let Some(gone) = self.current.remove(id) {
                diff.exit.push(gone);
            }
        }

        self.current = next;
        self.order = order;
        diff
    }

    /// Tiles currently on screen, in selection order
    pub fn tiles(&self) -> Vec<Arc<Tile>> {
        self.order
            .iter()
            .filter_map(|id| self.current.get(id).cloned())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Tile>> {
        self.current.get(id)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{transform::Transform, viewport::Viewport},
        tiles::selector::TileSelector,
    };

    fn select(x: f64, y: f64, k: f64) -> TileSelection {
        TileSelector::default().select(&Transform::new(x, y, k), &Viewport::new(1024.0, 768.0))
    }

    fn ids(tiles: &[Arc<Tile>]) -> Vec<&str> {
        tiles.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_first_join_enters_everything() {
        let mut join = TileJoin::new();
        let diff = join.update(&select(0.0, 0.0, 0.125));

        assert_eq!(diff.enter.len(), 12);
        assert!(diff.update.is_empty());
        assert!(diff.exit.is_empty());
        assert_eq!(join.len(), 12);
    }

    #[test]
    fn test_same_selection_is_unchanged_and_identity_stable() {
        let mut join = TileJoin::new();
        let first = join.update(&select(-8280.0, -4604.0, 2.0));
        let second = join.update(&select(-8280.0, -4604.0, 2.0));

        assert!(second.is_unchanged());
        assert_eq!(second.update.len(), first.enter.len());
        for (before, after) in first.enter.iter().zip(second.update.iter()) {
            assert!(Arc::ptr_eq(before, after));
        }
    }

    #[test]
    fn test_pan_by_one_column() {
        let mut join = TileJoin::new();
        join.update(&select(-8280.0, -4604.0, 2.0));
        let kept = join.get("5-8-17").cloned().unwrap();

        // one tile width to the left: column 16 leaves, column 19 enters
        let diff = join.update(&select(-8280.0 - 512.0, -4604.0, 2.0));

        assert_eq!(ids(&diff.enter), vec!["5-8-19", "5-9-19", "5-10-19"]);
        let mut exited = ids(&diff.exit);
        exited.sort();
        assert_eq!(exited, vec!["5-10-16", "5-8-16", "5-9-16"]);
        assert!(Arc::ptr_eq(&kept, join.get("5-8-17").unwrap()));
    }

    #[test]
    fn test_zoom_change_replaces_all_tiles() {
        let mut join = TileJoin::new();
        join.update(&select(0.0, 0.0, 0.125));
        let diff = join.update(&select(-8280.0, -4604.0, 2.0));

        assert_eq!(diff.exit.len(), 12);
        assert_eq!(diff.enter.len(), 9);
        assert!(diff.update.is_empty());
        assert_eq!(ids(&join.tiles())[0], "5-8-16");
    }
}

//! One-shot memoized overlay datasets.
//!
//! A layer asks for its dataset the first time it needs it. The guard makes
//! repeated asks while a load is in flight (or after it finished) no-ops, so
//! a dataset is fetched at most once. Only the first completion is accepted.

use crate::{MapError, Result};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Fetch the map should run on behalf of a layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRequest {
    pub layer_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LazyDataset<T> {
    name: String,
    state: LoadState,
    items: Vec<T>,
}

impl<T: DeserializeOwned> LazyDataset<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LoadState::Idle,
            items: Vec::new(),
        }
    }

    /// A dataset supplied up front; it never issues a request
    pub fn ready(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            state: LoadState::Ready,
            items,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Moves `Idle` to `Loading` and hands out the dataset name.
    ///
    /// Returns `None` when a load is already running or has finished.
    pub fn begin_load(&mut self) -> Option<&str> {
        if self.state != LoadState::Idle {
            return None;
        }
        self.state = LoadState::Loading;
        Some(&self.name)
    }

    /// Accepts the outcome of the load started by [`LazyDataset::begin_load`].
    ///
    /// A failure leaves the dataset empty and is reported on the import
    /// error channel. Returns `false` if no load was in flight, in which case
    /// the payload is dropped.
    pub fn resolve(&mut self, payload: Result<Vec<u8>>) -> bool {
        if self.state != LoadState::Loading {
            log::debug!("dropping duplicate completion for dataset {}", self.name);
            return false;
        }

        match payload.and_then(|bytes| parse_dataset(&self.name, &bytes)) {
            Ok(items) => {
                log::info!("loaded dataset {} ({} entries)", self.name, items.len());
                self.items = items;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                report_import_error(&e);
                self.items.clear();
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Loaded entries; empty until ready and after a failure
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

/// Parses a JSON array of entities. Unknown fields are ignored.
pub fn parse_dataset<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| MapError::Dataset {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Import error channel
pub fn report_import_error(error: &MapError) {
    log::error!("Import error: {}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::entity::PointEntity;

    #[test]
    fn test_guard_hands_out_one_load() {
        let mut dataset: LazyDataset<PointEntity> = LazyDataset::new("ports.json");

        assert_eq!(dataset.begin_load(), Some("ports.json"));
        assert!(dataset.is_loading());
        assert_eq!(dataset.begin_load(), None);
        assert_eq!(dataset.begin_load(), None);
    }

    #[test]
    fn test_first_completion_wins() {
        let mut dataset: LazyDataset<PointEntity> = LazyDataset::new("ports.json");
        dataset.begin_load();

        let payload = br#"[{"id": 1, "coordinates": [100, 100], "nation": "ignored"}]"#.to_vec();
        assert!(dataset.resolve(Ok(payload)));
        assert!(dataset.is_ready());
        assert_eq!(dataset.items().len(), 1);

        assert!(!dataset.resolve(Ok(b"[]".to_vec())));
        assert_eq!(dataset.items().len(), 1);
        assert_eq!(dataset.begin_load(), None);
    }

    #[test]
    fn test_malformed_payload_degrades_to_empty() {
        let mut dataset: LazyDataset<PointEntity> = LazyDataset::new("ports.json");
        dataset.begin_load();

        assert!(dataset.resolve(Ok(b"{ not json".to_vec())));
        assert!(matches!(dataset.state(), LoadState::Failed(_)));
        assert!(dataset.items().is_empty());
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty() {
        let mut dataset: LazyDataset<PointEntity> = LazyDataset::new("pb-zones.json");
        dataset.begin_load();

        let error = MapError::Dataset {
            name: "pb-zones.json".to_string(),
            reason: "404".to_string(),
        };
        assert!(dataset.resolve(Err(error)));
        assert!(dataset.items().is_empty());
        assert_eq!(dataset.begin_load(), None);
    }

    #[test]
    fn test_ready_dataset_never_requests() {
        let mut dataset = LazyDataset::ready(
            "ports.json",
            vec![PointEntity::new(1, crate::core::geo::Point::new(1.0, 2.0))],
        );
        assert_eq!(dataset.begin_load(), None);
        assert_eq!(dataset.items().len(), 1);
    }
}

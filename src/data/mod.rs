//! Overlay dataset loading
//!
//! Layers own their datasets. This module provides the lazy, load-once
//! container they keep them in and the sources the map fetches from.

pub mod dataset;
pub mod source;

pub use dataset::{parse_dataset, report_import_error, DatasetRequest, LazyDataset, LoadState};
#[cfg(feature = "tokio-runtime")]
pub use source::FileDatasetSource;
#[cfg(feature = "http")]
pub use source::HttpDatasetSource;
pub use source::{DatasetSource, MemoryDatasetSource};

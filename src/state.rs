use crate::models::Dataset;
use std::{path::PathBuf, sync::Arc};

/// Shared per-process state. The dataset is read-only after load, so each
/// request aggregates over the same snapshot without locking.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(data_path: PathBuf, dataset: Dataset) -> Self {
        Self {
            data_path,
            dataset: Arc::new(dataset),
        }
    }
}

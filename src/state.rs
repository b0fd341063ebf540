use crate::airtable::RemoteStore;
use crate::config::TrackerConfig;
use crate::daylog::SyncStatus;
use crate::models::TrackerData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Backend sync bookkeeping. `saving` is the in-flight flag that rejects
/// overlapping saves; it is not a lock on the data.
#[derive(Debug)]
pub struct SyncState {
    pub status: SyncStatus,
    pub saving: bool,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            status: SyncStatus::Idle,
            saving: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TrackerConfig>,
    pub data_path: PathBuf,
    pub data: Arc<Mutex<TrackerData>>,
    pub remote: Option<Arc<RemoteStore>>,
    pub sync: Arc<Mutex<SyncState>>,
}

impl AppState {
    pub fn new(
        config: TrackerConfig,
        data_path: PathBuf,
        data: TrackerData,
        remote: Option<RemoteStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            data_path,
            data: Arc::new(Mutex::new(data)),
            remote: remote.map(Arc::new),
            sync: Arc::new(Mutex::new(SyncState::default())),
        }
    }
}

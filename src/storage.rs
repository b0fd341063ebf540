use crate::errors::AppError;
use crate::models::TrackerData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/tracker.json"))
}

/// A missing file or corrupt JSON is recovered with defaults; local data
/// problems never propagate past this point.
pub async fn load_data(path: &Path) -> TrackerData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                TrackerData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => TrackerData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            TrackerData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &TrackerData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

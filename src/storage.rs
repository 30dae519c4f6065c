use crate::errors::AppError;
use crate::models::HabitSnapshot;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Loads the last persisted snapshot; a missing or unreadable file starts
/// empty rather than aborting startup.
pub async fn load_snapshot(path: &Path) -> HabitSnapshot {
    match fs::read(path).await {
        Ok(bytes) => match HabitSnapshot::from_json(&bytes) {
            Ok(snapshot) => {
                info!(habits = snapshot.habits.len(), "loaded habit snapshot");
                snapshot
            }
            Err(err) => {
                error!("failed to parse snapshot file: {err}");
                HabitSnapshot::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => HabitSnapshot::default(),
        Err(err) => {
            error!("failed to read snapshot file: {err}");
            HabitSnapshot::default()
        }
    }
}

pub async fn persist_snapshot(path: &Path, snapshot: &HabitSnapshot) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(snapshot).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

use crate::config::AppConfig;
use crate::models::HabitSnapshot;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub snapshot: Arc<Mutex<HabitSnapshot>>,
}

impl AppState {
    pub fn new(config: AppConfig, snapshot: HabitSnapshot) -> Self {
        Self {
            config: Arc::new(config),
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }
}

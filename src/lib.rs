pub mod app;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod report;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;

pub use app::router;
pub use config::AppConfig;
pub use errors::AnalyticsError;
pub use snapshot::Snapshot;
pub use state::AppState;
pub use stats::CompletionRateRule;
pub use storage::load_snapshot;

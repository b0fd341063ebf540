pub mod airtable;
pub mod app;
pub mod config;
pub mod daylog;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod score;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};

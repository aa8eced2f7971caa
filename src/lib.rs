pub mod api;
pub mod config;
pub mod recognition;
pub mod state;
pub mod telemetry;

pub use config::ServiceConfig;
pub use state::AppState;
